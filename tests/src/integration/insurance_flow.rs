//! # Insurance Flow
//!
//! Premium escrow and payout against consensus-resolved flight status, plus
//! the ledger-wide guarantees the flow relies on: pause and atomic failure.

use super::*;
use fs_01_account_authority::AuthorityError;
use shared_bus::{EventFilter, EventTopic, SuretyEvent};
use shared_types::{ErrorKind, StatusCode, ETHER};
use surety_node::LedgerError;

/// Register three oracles that all hold index 0 and open a round on it.
async fn ledger_with_round(designator: &str) -> SuretyLedger {
    let ledger = genesis_ledger(
        fs_04_oracle_consensus::SequenceEntropy::new(vec![0]),
        InMemoryEventBus::new(),
    )
    .await;
    for n in 0..3 {
        ledger.deposit(oracle(n), ether(2)).await;
        ledger.register_oracle(oracle(n), ETHER).await.unwrap();
    }
    ledger
        .register_flight(airline(1), designator, DEPARTURE)
        .await
        .unwrap();
    ledger
}

async fn resolve(ledger: &SuretyLedger, designator: &str, status: StatusCode) {
    ledger
        .fetch_flight_status(airline(1), airline(1), designator, DEPARTURE)
        .await
        .unwrap();
    for n in 0..3 {
        ledger
            .submit_oracle_response(oracle(n), 0, airline(1), designator, DEPARTURE, status)
            .await
            .unwrap();
    }
}

async fn insure(ledger: &SuretyLedger, who: Identity, designator: &str, premium: u128) {
    ledger.deposit(who, ether(3)).await;
    ledger
        .buy_insurance(who, airline(1), designator, DEPARTURE, premium)
        .await
        .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_late_airline_pays_one_and_a_half() {
        let ledger = ledger_with_round("ND1309").await;
        insure(&ledger, passenger(1), "ND1309", ETHER).await;
        insure(&ledger, passenger(2), "ND1309", ETHER / 2).await;
        assert_eq!(ledger.pool_balance().await, ether(10) + ETHER + ETHER / 2);

        resolve(&ledger, "ND1309", StatusCode::LateAirline).await;

        let first = ledger
            .payout(passenger(1), airline(1), "ND1309", DEPARTURE)
            .await
            .unwrap();
        let second = ledger
            .payout(passenger(2), airline(1), "ND1309", DEPARTURE)
            .await
            .unwrap();
        assert_eq!(first, 3 * ETHER / 2);
        assert_eq!(second, 3 * ETHER / 4);
        assert_eq!(ledger.balance_of(passenger(1)).await, ether(2) + first);

        let paid: Vec<_> = ledger
            .past_events(&EventFilter::topics(vec![EventTopic::Insurance]))
            .into_iter()
            .filter_map(|e| match e.event {
                SuretyEvent::InsurancePaid { amount, .. } => Some(amount),
                _ => None,
            })
            .collect();
        assert_eq!(paid, vec![first, second]);
    }

    #[tokio::test]
    async fn test_no_double_payout() {
        let ledger = ledger_with_round("ND1309").await;
        insure(&ledger, passenger(1), "ND1309", ETHER).await;
        resolve(&ledger, "ND1309", StatusCode::LateAirline).await;

        ledger
            .payout(passenger(1), airline(1), "ND1309", DEPARTURE)
            .await
            .unwrap();
        let balance = ledger.balance_of(passenger(1)).await;

        let err = ledger
            .payout(passenger(1), airline(1), "ND1309", DEPARTURE)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyClaimed);
        assert_eq!(ledger.balance_of(passenger(1)).await, balance);
    }

    #[tokio::test]
    async fn test_other_delays_are_not_covered() {
        for status in [
            StatusCode::OnTime,
            StatusCode::LateWeather,
            StatusCode::LateTechnical,
            StatusCode::LateOther,
        ] {
            let ledger = ledger_with_round("ND1309").await;
            insure(&ledger, passenger(1), "ND1309", ETHER).await;
            resolve(&ledger, "ND1309", status).await;

            let err = ledger
                .payout(passenger(1), airline(1), "ND1309", DEPARTURE)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotEligible, "status {status}");
        }
    }

    #[tokio::test]
    async fn test_one_policy_per_passenger_and_flight() {
        let ledger = ledger_with_round("ND1309").await;
        insure(&ledger, passenger(1), "ND1309", ETHER / 2).await;

        let err = ledger
            .buy_insurance(passenger(1), airline(1), "ND1309", DEPARTURE, ETHER / 2)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyRegistered);
        assert!(
            ledger
                .is_insurance_registered(passenger(1), airline(1), "ND1309", DEPARTURE)
                .await
        );
        assert!(
            !ledger
                .is_insurance_registered(passenger(2), airline(1), "ND1309", DEPARTURE)
                .await
        );
    }

    #[tokio::test]
    async fn test_pause_blocks_every_mutation() {
        let ledger = ledger_with_round("ND1309").await;
        insure(&ledger, passenger(1), "ND1309", ETHER).await;
        ledger
            .fetch_flight_status(airline(1), airline(1), "ND1309", DEPARTURE)
            .await
            .unwrap();

        ledger.set_operational(owner(), false).await.unwrap();
        let published = ledger.events_published();

        let paused = LedgerError::Authority(AuthorityError::NotOperational);
        assert_eq!(
            ledger
                .submit_oracle_response(
                    oracle(0),
                    0,
                    airline(1),
                    "ND1309",
                    DEPARTURE,
                    StatusCode::LateAirline
                )
                .await
                .unwrap_err(),
            paused
        );
        assert_eq!(
            ledger
                .register_airline(airline(1), airline(2))
                .await
                .unwrap_err(),
            paused
        );
        assert_eq!(
            ledger
                .buy_insurance(passenger(2), airline(1), "ND1309", DEPARTURE, ETHER)
                .await
                .unwrap_err()
                .kind(),
            ErrorKind::NotOperational
        );
        assert_eq!(ledger.events_published(), published);

        // Queries keep working while paused.
        assert!(ledger.is_airline_funded(airline(1)).await);
        assert!(ledger.is_oracle_registered(oracle(0)).await);

        ledger.set_operational(owner(), true).await.unwrap();
        resolve(&ledger, "ND1309", StatusCode::LateAirline).await;
        assert!(ledger
            .payout(passenger(1), airline(1), "ND1309", DEPARTURE)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_failed_calls_emit_nothing() {
        let ledger = ledger_with_round("ND1309").await;
        let published = ledger.events_published();
        let pool = ledger.pool_balance().await;

        // Premium above the cap.
        ledger.deposit(passenger(1), ether(5)).await;
        assert!(ledger
            .buy_insurance(passenger(1), airline(1), "ND1309", DEPARTURE, ether(2))
            .await
            .is_err());
        // Funding below the minimum.
        ledger.register_airline(airline(1), airline(2)).await.unwrap();
        let after_admission = ledger.events_published();
        ledger.deposit(airline(2), ether(20)).await;
        assert!(ledger.fund_airline(airline(2), ETHER).await.is_err());
        // Payout before any policy.
        assert!(ledger
            .payout(passenger(1), airline(1), "ND1309", DEPARTURE)
            .await
            .is_err());

        assert_eq!(after_admission, published + 1);
        assert_eq!(ledger.events_published(), after_admission);
        assert_eq!(ledger.pool_balance().await, pool);
        assert_eq!(ledger.balance_of(passenger(1)).await, ether(5));
        assert_eq!(ledger.balance_of(airline(2)).await, ether(20));
        assert!(!ledger.is_airline_funded(airline(2)).await);
    }
}
