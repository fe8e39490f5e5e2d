//! # Admission and Consensus End to End
//!
//! The reference scenario: four airlines admitted directly, a fifth admitted
//! by quorum, twenty oracles registered, one status round resolved by the
//! oracles holding its index.

use super::*;
use fs_02_airline_registry::Admission;
use fs_04_oracle_consensus::Attestation;
use shared_bus::{EventFilter, EventTopic, SuretyEvent};
use shared_types::{ErrorKind, StatusCode, ETHER};

/// Register `count` oracles, each with enough balance for the fee.
async fn register_oracles(ledger: &SuretyLedger, count: u64) {
    for n in 0..count {
        ledger.deposit(oracle(n), ether(5)).await;
        ledger.register_oracle(oracle(n), ETHER).await.unwrap();
    }
}

/// Oracles among the first `count` that hold `index`, in registration order.
async fn holders_of(ledger: &SuretyLedger, count: u64, index: u8) -> Vec<Identity> {
    let mut holders = Vec::new();
    for n in 0..count {
        if ledger
            .get_my_indexes(oracle(n))
            .await
            .unwrap()
            .contains(&index)
        {
            holders.push(oracle(n));
        }
    }
    holders
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // AIRLINE ADMISSION
    // =========================================================================

    #[tokio::test]
    async fn test_first_four_airlines_admitted_directly() {
        let ledger = genesis_ledger(cycling_entropy(), InMemoryEventBus::new()).await;

        for n in 2..=4 {
            assert_eq!(
                ledger.register_airline(airline(1), airline(n)).await.unwrap(),
                Admission::Admitted
            );
            assert!(ledger.is_airline_registered(airline(n)).await);
            assert!(!ledger.is_airline_funded(airline(n)).await);
        }
    }

    #[tokio::test]
    async fn test_fifth_airline_needs_half_the_members() {
        let ledger = genesis_ledger(cycling_entropy(), InMemoryEventBus::new()).await;
        for n in 2..=4 {
            ledger.register_airline(airline(1), airline(n)).await.unwrap();
            fund(&ledger, airline(n)).await;
        }

        assert_eq!(
            ledger.register_airline(airline(1), airline(5)).await.unwrap(),
            Admission::Pending {
                votes: 1,
                required: 2
            }
        );
        assert!(!ledger.is_airline_registered(airline(5)).await);

        let repeat = ledger
            .register_airline(airline(1), airline(5))
            .await
            .unwrap_err();
        assert_eq!(repeat.kind(), ErrorKind::DuplicateVote);

        assert_eq!(
            ledger.register_airline(airline(2), airline(5)).await.unwrap(),
            Admission::Admitted
        );
        assert!(ledger.is_airline_registered(airline(5)).await);

        // Third vote lands on a member and changes nothing.
        assert_eq!(
            ledger.register_airline(airline(3), airline(5)).await.unwrap(),
            Admission::AlreadyMember
        );

        let admitted = ledger
            .past_events(&EventFilter::topics(vec![EventTopic::Admission]))
            .into_iter()
            .filter(|e| e.event == SuretyEvent::AirlineRegistered { airline: airline(5) })
            .count();
        assert_eq!(admitted, 1);
    }

    #[tokio::test]
    async fn test_unfunded_member_cannot_vote() {
        let ledger = genesis_ledger(cycling_entropy(), InMemoryEventBus::new()).await;
        ledger.register_airline(airline(1), airline(2)).await.unwrap();

        let err = ledger
            .register_airline(airline(2), airline(3))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(!ledger.is_airline_registered(airline(3)).await);
    }

    // =========================================================================
    // ORACLE CONSENSUS
    // =========================================================================

    #[tokio::test]
    async fn test_reference_scenario() {
        let ledger = genesis_ledger(cycling_entropy(), InMemoryEventBus::new()).await;
        for n in 2..=4 {
            ledger.register_airline(airline(1), airline(n)).await.unwrap();
            fund(&ledger, airline(n)).await;
        }
        ledger.register_airline(airline(1), airline(5)).await.unwrap();
        ledger.register_airline(airline(2), airline(5)).await.unwrap();
        ledger.register_airline(airline(3), airline(5)).await.unwrap();
        assert!(ledger.is_airline_registered(airline(5)).await);

        register_oracles(&ledger, 20).await;
        for n in 0..20 {
            let first = ledger.get_my_indexes(oracle(n)).await.unwrap();
            assert_eq!(ledger.get_my_indexes(oracle(n)).await.unwrap(), first);
        }

        ledger
            .register_flight(airline(1), "ND1309", DEPARTURE)
            .await
            .unwrap();
        let round = ledger
            .fetch_flight_status(airline(1), airline(1), "ND1309", DEPARTURE)
            .await
            .unwrap();
        let k = round.index;

        let requests = ledger.past_events(&EventFilter::oracle_requests());
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].event,
            SuretyEvent::OracleRequest {
                index: k,
                airline: airline(1),
                designator: "ND1309".into(),
                timestamp: DEPARTURE,
            }
        );

        let holders = holders_of(&ledger, 20, k).await;
        assert!(holders.len() > 3);

        let mut outcomes = Vec::new();
        for holder in &holders {
            outcomes.push(
                ledger
                    .submit_oracle_response(
                        *holder,
                        k,
                        airline(1),
                        "ND1309",
                        DEPARTURE,
                        StatusCode::OnTime,
                    )
                    .await,
            );
        }

        assert_eq!(
            outcomes[2].clone().unwrap(),
            Attestation::Finalized(StatusCode::OnTime)
        );
        for late in &outcomes[3..] {
            assert_eq!(late.clone().unwrap_err().kind(), ErrorKind::NotEligible);
        }
        assert_eq!(
            ledger
                .get_flight_status_code(airline(1), "ND1309", DEPARTURE)
                .await
                .unwrap(),
            StatusCode::OnTime
        );

        let resolved = ledger
            .past_events(&EventFilter::topics(vec![EventTopic::Consensus]))
            .into_iter()
            .filter(|e| matches!(e.event, SuretyEvent::FlightStatusInfo { .. }))
            .count();
        assert_eq!(resolved, 1);
    }

    #[tokio::test]
    async fn test_non_holder_and_duplicate_attestations_rejected() {
        let ledger = genesis_ledger(cycling_entropy(), InMemoryEventBus::new()).await;
        register_oracles(&ledger, 10).await;
        ledger
            .register_flight(airline(1), "ND1309", DEPARTURE)
            .await
            .unwrap();
        let k = ledger
            .fetch_flight_status(airline(1), airline(1), "ND1309", DEPARTURE)
            .await
            .unwrap()
            .index;

        let holders = holders_of(&ledger, 10, k).await;
        let outsider = (0..10)
            .map(oracle)
            .find(|o| !holders.contains(o))
            .unwrap();

        let err = ledger
            .submit_oracle_response(outsider, k, airline(1), "ND1309", DEPARTURE, StatusCode::OnTime)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        ledger
            .submit_oracle_response(holders[0], k, airline(1), "ND1309", DEPARTURE, StatusCode::OnTime)
            .await
            .unwrap();
        let again = ledger
            .submit_oracle_response(
                holders[0],
                k,
                airline(1),
                "ND1309",
                DEPARTURE,
                StatusCode::LateAirline,
            )
            .await
            .unwrap_err();
        assert_eq!(again.kind(), ErrorKind::DuplicateResponse);
    }

    #[tokio::test]
    async fn test_split_votes_do_not_finalize() {
        let ledger = genesis_ledger(cycling_entropy(), InMemoryEventBus::new()).await;
        register_oracles(&ledger, 20).await;
        ledger
            .register_flight(airline(1), "ND1309", DEPARTURE)
            .await
            .unwrap();
        let k = ledger
            .fetch_flight_status(airline(1), airline(1), "ND1309", DEPARTURE)
            .await
            .unwrap()
            .index;
        let holders = holders_of(&ledger, 20, k).await;

        let statuses = [
            StatusCode::OnTime,
            StatusCode::LateWeather,
            StatusCode::OnTime,
            StatusCode::LateWeather,
        ];
        for (holder, status) in holders.iter().zip(statuses) {
            let outcome = ledger
                .submit_oracle_response(*holder, k, airline(1), "ND1309", DEPARTURE, status)
                .await
                .unwrap();
            assert!(matches!(outcome, Attestation::Recorded { .. }));
        }
        assert_eq!(
            ledger
                .get_flight_status_code(airline(1), "ND1309", DEPARTURE)
                .await
                .unwrap(),
            StatusCode::Unknown
        );
    }
}
