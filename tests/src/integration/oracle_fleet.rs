//! # Oracle Fleet
//!
//! Real agents racing over one ledger. Agents never coordinate; the ledger's
//! one-vote-per-round and finalize-once rules must still yield exactly one
//! resolution per flight.

use super::*;
use fs_06_oracle_agent::{AgentConfig, AgentHandle, FixedStatusSource, OracleAgent};
use shared_bus::{EventFilter, EventTopic, SuretyEvent};
use shared_types::{FlightKey, StatusCode, ETHER};
use std::sync::Arc;
use std::time::Duration;
use surety_node::adapters::LocalLedgerGateway;

fn agent_config() -> AgentConfig {
    AgentConfig {
        base_backoff_ms: 5,
        max_backoff_ms: 50,
        ..Default::default()
    }
}

/// Start `count` agents in order, so index draws follow [`cycling_entropy`].
async fn start_fleet(
    ledger: &Arc<SuretyLedger>,
    count: u64,
    status: StatusCode,
) -> Vec<AgentHandle> {
    let gateway = Arc::new(LocalLedgerGateway::new(Arc::clone(ledger)));
    let source = Arc::new(FixedStatusSource(status));
    let mut handles = Vec::new();
    for n in 0..count {
        ledger.deposit(oracle(n), ether(2)).await;
        let agent = OracleAgent::new(oracle(n), gateway.clone(), source.clone(), agent_config());
        handles.push(agent.start().await.unwrap());
    }
    handles
}

/// Poll until every flight has a resolved status.
async fn wait_resolved(ledger: &SuretyLedger, flights: &[FlightKey]) -> bool {
    for _ in 0..400 {
        let mut pending = false;
        for flight in flights {
            let status = ledger
                .get_flight_status_code(flight.airline, &flight.designator, flight.timestamp)
                .await
                .unwrap();
            pending |= !status.is_resolved();
        }
        if !pending {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

fn resolutions(ledger: &SuretyLedger) -> Vec<SuretyEvent> {
    ledger
        .past_events(&EventFilter::topics(vec![EventTopic::Consensus]))
        .into_iter()
        .map(|e| e.event)
        .filter(|e| matches!(e, SuretyEvent::FlightStatusInfo { .. }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_fleet_resolves_flight_once() {
        let ledger = Arc::new(genesis_ledger(cycling_entropy(), InMemoryEventBus::new()).await);
        let agents = start_fleet(&ledger, 20, StatusCode::LateAirline).await;
        for handle in &agents {
            assert!(ledger.is_oracle_registered(handle.identity()).await);
        }

        let flight = ledger
            .register_flight(airline(1), "ND1309", DEPARTURE)
            .await
            .unwrap();
        ledger.deposit(passenger(1), ETHER).await;
        ledger
            .buy_insurance(passenger(1), airline(1), "ND1309", DEPARTURE, ETHER)
            .await
            .unwrap();
        ledger
            .fetch_flight_status(airline(1), airline(1), "ND1309", DEPARTURE)
            .await
            .unwrap();

        assert!(wait_resolved(&ledger, &[flight]).await);

        let mut accepted = 0;
        let mut matched = 0;
        for handle in agents {
            let stats = handle.stop().await.unwrap();
            accepted += stats.responses_submitted;
            matched += stats.requests_matched;
        }

        assert_eq!(resolutions(&ledger).len(), 1);
        assert!(accepted >= 3);
        assert!(accepted <= matched);
        assert_eq!(
            ledger
                .payout(passenger(1), airline(1), "ND1309", DEPARTURE)
                .await
                .unwrap(),
            3 * ETHER / 2
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_late_joining_fleet_replays_requests() {
        let ledger = Arc::new(genesis_ledger(cycling_entropy(), InMemoryEventBus::new()).await);

        // Rounds need registered oracles; register the roster up front and
        // let the agents attach afterwards.
        for n in 0..20 {
            ledger.deposit(oracle(n), ether(2)).await;
            ledger.register_oracle(oracle(n), ETHER).await.unwrap();
        }
        let flight = ledger
            .register_flight(airline(1), "ND1309", DEPARTURE)
            .await
            .unwrap();
        ledger
            .fetch_flight_status(airline(1), airline(1), "ND1309", DEPARTURE)
            .await
            .unwrap();

        let agents = start_fleet(&ledger, 20, StatusCode::OnTime).await;
        assert!(wait_resolved(&ledger, &[flight]).await);
        for handle in agents {
            handle.stop().await.unwrap();
        }

        assert_eq!(
            resolutions(&ledger),
            vec![SuretyEvent::FlightStatusInfo {
                airline: airline(1),
                designator: "ND1309".into(),
                timestamp: DEPARTURE,
                status: StatusCode::OnTime,
            }]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_fleet_survives_small_event_channel() {
        let ledger = Arc::new(
            genesis_ledger(cycling_entropy(), InMemoryEventBus::with_limits(2, 1_000)).await,
        );
        let agents = start_fleet(&ledger, 20, StatusCode::LateWeather).await;

        let mut flights = Vec::new();
        for n in 0..5 {
            flights.push(
                ledger
                    .register_flight(airline(1), format!("ND13{n:02}"), DEPARTURE)
                    .await
                    .unwrap(),
            );
        }
        for flight in &flights {
            ledger
                .fetch_flight_status(airline(1), airline(1), &flight.designator, DEPARTURE)
                .await
                .unwrap();
        }

        assert!(wait_resolved(&ledger, &flights).await);
        for handle in agents {
            handle.stop().await.unwrap();
        }
        assert_eq!(resolutions(&ledger).len(), 5);
    }
}
