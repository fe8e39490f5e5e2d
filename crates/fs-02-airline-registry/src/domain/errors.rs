//! Error types for the Airline Registry.

use shared_types::{Amount, ErrorKind, Identity};
use thiserror::Error;

/// Airline registry errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AirlineError {
    /// Caller is not a registered airline.
    #[error("Airline {0} is not registered")]
    NotRegistered(Identity),

    /// Caller is registered but has not deposited its funding.
    #[error("Airline {0} has not been funded")]
    NotFunded(Identity),

    /// The registry was already seeded with its first airline.
    #[error("Registry already bootstrapped (attempted {0})")]
    AlreadyBootstrapped(Identity),

    /// Voter already supports this candidate.
    #[error("Airline {voter} already voted for {candidate}")]
    DuplicateVote {
        /// The repeated voter.
        voter: Identity,
        /// The pending candidate.
        candidate: Identity,
    },

    /// Funding deposit below the minimum.
    #[error("Insufficient funding: {provided} < {required}")]
    InsufficientFunding {
        /// Value attached to the call.
        provided: Amount,
        /// Minimum deposit.
        required: Amount,
    },
}

impl AirlineError {
    /// Taxonomy label of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotRegistered(_) | Self::NotFunded(_) => ErrorKind::Unauthorized,
            Self::AlreadyBootstrapped(_) => ErrorKind::AlreadyRegistered,
            Self::DuplicateVote { .. } => ErrorKind::DuplicateVote,
            Self::InsufficientFunding { .. } => ErrorKind::InsufficientFunds,
        }
    }
}

/// Result type for airline registry operations.
pub type AirlineResult<T> = Result<T, AirlineError>;
