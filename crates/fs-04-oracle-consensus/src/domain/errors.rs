//! Error types for oracle consensus.

use super::RoundKey;
use shared_types::{Amount, ErrorKind, Identity};
use thiserror::Error;

/// Oracle roster and consensus errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OracleError {
    /// Registration fee below the required amount.
    #[error("Insufficient registration fee: {provided} < {required}")]
    InsufficientFee {
        /// Value attached to the call.
        provided: Amount,
        /// Required fee.
        required: Amount,
    },

    /// Identity is already on the roster.
    #[error("Oracle {0} is already registered")]
    AlreadyRegistered(Identity),

    /// Identity is not on the roster.
    #[error("Oracle {0} is not registered")]
    NotRegistered(Identity),

    /// Oracle does not hold the index it attested under.
    #[error("Oracle {oracle} does not hold index {index}")]
    IndexNotAssigned {
        /// Attesting oracle.
        oracle: Identity,
        /// Claimed index.
        index: u8,
    },

    /// No round was opened for this key.
    #[error("No round open for {0}")]
    RoundNotFound(RoundKey),

    /// Round already finalized.
    #[error("Round {0} is closed")]
    RoundClosed(RoundKey),

    /// Oracle already attested in this round.
    #[error("Oracle {oracle} already responded in round {round}")]
    DuplicateResponse {
        /// Repeating oracle.
        oracle: Identity,
        /// The round.
        round: RoundKey,
    },
}

impl OracleError {
    /// Taxonomy label of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientFee { .. } => ErrorKind::InsufficientFunds,
            Self::AlreadyRegistered(_) => ErrorKind::AlreadyRegistered,
            Self::NotRegistered(_) | Self::RoundNotFound(_) => ErrorKind::NotFound,
            Self::IndexNotAssigned { .. } => ErrorKind::Unauthorized,
            Self::RoundClosed(_) => ErrorKind::NotEligible,
            Self::DuplicateResponse { .. } => ErrorKind::DuplicateResponse,
        }
    }
}

/// Result type for oracle consensus operations.
pub type OracleResult<T> = Result<T, OracleError>;
