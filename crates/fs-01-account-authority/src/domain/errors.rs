//! Error types for the Account Authority.

use shared_types::{ErrorKind, Identity};
use thiserror::Error;

/// Errors raised by the permission gate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorityError {
    /// Only the owner may change authorizations or the operational switch.
    #[error("Caller {0} is not the authority owner")]
    NotOwner(Identity),

    /// Identity was never authorized (or was revoked).
    #[error("Identity {0} is not authorized to mutate registry state")]
    Unauthorized(Identity),

    /// The owner has paused all mutations.
    #[error("Ledger is not operational")]
    NotOperational,
}

impl AuthorityError {
    /// Taxonomy label of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotOwner(_) | Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::NotOperational => ErrorKind::NotOperational,
        }
    }
}

/// Result type for authority operations.
pub type AuthorityResult<T> = Result<T, AuthorityError>;
