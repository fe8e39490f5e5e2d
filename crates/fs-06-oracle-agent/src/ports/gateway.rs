//! Ledger gateway - outbound port.

use async_trait::async_trait;
use shared_bus::Subscription;
use shared_types::{Amount, ErrorKind, FlightKey, Identity, StatusCode, ORACLE_INDEX_COUNT};
use thiserror::Error;

/// Failures returned by the gateway.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The ledger executed the call and refused it.
    #[error("Rejected by ledger ({0}): {1}")]
    Rejected(ErrorKind, String),

    /// The call did not reach the ledger or its answer was lost.
    #[error("Transport failure: {0}")]
    Transport(String),
}

impl GatewayError {
    /// Only transport failures are worth retrying.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Taxonomy label of a rejection.
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Rejected(kind, _) => Some(*kind),
            Self::Transport(_) => None,
        }
    }
}

/// Result type for gateway calls.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// The agent's view of the ledger.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Whether `oracle` is on the roster.
    async fn is_oracle_registered(&self, oracle: Identity) -> GatewayResult<bool>;

    /// Join the roster, paying `fee`.
    async fn register_oracle(
        &self,
        oracle: Identity,
        fee: Amount,
    ) -> GatewayResult<[u8; ORACLE_INDEX_COUNT]>;

    /// Indexes assigned to `oracle`.
    async fn get_my_indexes(&self, oracle: Identity) -> GatewayResult<[u8; ORACLE_INDEX_COUNT]>;

    /// Current resolved status of a flight.
    async fn get_flight_status_code(&self, flight: &FlightKey) -> GatewayResult<StatusCode>;

    /// Submit one attestation.
    async fn submit_oracle_response(
        &self,
        oracle: Identity,
        index: u8,
        flight: &FlightKey,
        status: StatusCode,
    ) -> GatewayResult<()>;

    /// Subscribe to `OracleRequest` events from the earliest retained one.
    async fn subscribe_requests(&self) -> GatewayResult<Subscription>;
}
