//! Error types for the Flight Registry.

use shared_types::{ErrorKind, FlightKey};
use thiserror::Error;

/// Flight registry errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlightError {
    /// A flight with this key already exists.
    #[error("Flight {0} is already registered")]
    AlreadyRegistered(FlightKey),

    /// No flight with this key.
    #[error("Flight {0} is not registered")]
    NotFound(FlightKey),
}

impl FlightError {
    /// Taxonomy label of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyRegistered(_) => ErrorKind::AlreadyRegistered,
            Self::NotFound(_) => ErrorKind::NotFound,
        }
    }
}

/// Result type for flight registry operations.
pub type FlightResult<T> = Result<T, FlightError>;
