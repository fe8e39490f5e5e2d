//! # Local Ledger Gateway
//!
//! Serves the oracle agent's [`LedgerGateway`] port from an in-process
//! ledger. Every ledger error is a definitive rejection; an in-process call
//! has no transport to fail.

use crate::ledger::{LedgerError, SuretyLedger};
use async_trait::async_trait;
use fs_06_oracle_agent::{GatewayError, GatewayResult, LedgerGateway};
use shared_bus::{EventFilter, StartPosition, Subscription};
use shared_types::{Amount, FlightKey, Identity, StatusCode, ORACLE_INDEX_COUNT};
use std::sync::Arc;

/// Gateway over a shared [`SuretyLedger`].
#[derive(Clone)]
pub struct LocalLedgerGateway {
    ledger: Arc<SuretyLedger>,
}

impl LocalLedgerGateway {
    /// Wrap `ledger`.
    pub fn new(ledger: Arc<SuretyLedger>) -> Self {
        Self { ledger }
    }
}

fn rejected(e: LedgerError) -> GatewayError {
    GatewayError::Rejected(e.kind(), e.to_string())
}

#[async_trait]
impl LedgerGateway for LocalLedgerGateway {
    async fn is_oracle_registered(&self, oracle: Identity) -> GatewayResult<bool> {
        Ok(self.ledger.is_oracle_registered(oracle).await)
    }

    async fn register_oracle(
        &self,
        oracle: Identity,
        fee: Amount,
    ) -> GatewayResult<[u8; ORACLE_INDEX_COUNT]> {
        self.ledger
            .register_oracle(oracle, fee)
            .await
            .map_err(rejected)
    }

    async fn get_my_indexes(&self, oracle: Identity) -> GatewayResult<[u8; ORACLE_INDEX_COUNT]> {
        self.ledger.get_my_indexes(oracle).await.map_err(rejected)
    }

    async fn get_flight_status_code(&self, flight: &FlightKey) -> GatewayResult<StatusCode> {
        self.ledger
            .get_flight_status_code(flight.airline, &flight.designator, flight.timestamp)
            .await
            .map_err(rejected)
    }

    async fn submit_oracle_response(
        &self,
        oracle: Identity,
        index: u8,
        flight: &FlightKey,
        status: StatusCode,
    ) -> GatewayResult<()> {
        self.ledger
            .submit_oracle_response(
                oracle,
                index,
                flight.airline,
                &flight.designator,
                flight.timestamp,
                status,
            )
            .await
            .map(|_| ())
            .map_err(rejected)
    }

    async fn subscribe_requests(&self) -> GatewayResult<Subscription> {
        Ok(self
            .ledger
            .subscribe(EventFilter::oracle_requests(), StartPosition::Earliest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ProtocolConfig;
    use fs_04_oracle_consensus::SequenceEntropy;
    use shared_bus::InMemoryEventBus;
    use shared_types::{ErrorKind, ETHER};

    fn create_test_gateway() -> LocalLedgerGateway {
        let ledger = SuretyLedger::new(
            Identity::from_low_u64(1),
            Identity::from_low_u64(2),
            &ProtocolConfig::default(),
            InMemoryEventBus::new(),
            Box::new(SequenceEntropy::new(vec![1, 2, 3])),
        );
        LocalLedgerGateway::new(Arc::new(ledger))
    }

    #[tokio::test]
    async fn test_ledger_errors_become_rejections() {
        let gateway = create_test_gateway();
        let oracle = Identity::from_low_u64(1_000);

        let err = gateway.get_my_indexes(oracle).await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::NotFound));
        assert!(!err.is_transient());

        // App not yet authorized.
        let err = gateway.register_oracle(oracle, ETHER).await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Unauthorized));
    }

    #[tokio::test]
    async fn test_registration_through_gateway() {
        let gateway = create_test_gateway();
        let owner = Identity::from_low_u64(1);
        let oracle = Identity::from_low_u64(1_000);
        gateway
            .ledger
            .authorize_app(owner, gateway.ledger.app())
            .await
            .unwrap();
        gateway.ledger.deposit(oracle, ETHER).await;

        assert!(!gateway.is_oracle_registered(oracle).await.unwrap());
        let indexes = gateway.register_oracle(oracle, ETHER).await.unwrap();
        assert_eq!(indexes, [1, 2, 3]);
        assert_eq!(gateway.get_my_indexes(oracle).await.unwrap(), indexes);
    }

    #[tokio::test]
    async fn test_unknown_flight_status_is_rejected() {
        let gateway = create_test_gateway();
        let flight = FlightKey::new(Identity::from_low_u64(10), "ND1309", 1);
        let err = gateway.get_flight_status_code(&flight).await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    }
}
