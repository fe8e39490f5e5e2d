//! Flight entity.

use serde::{Deserialize, Serialize};
use shared_types::{FlightKey, StatusCode};

/// A registered flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    /// Composite key.
    pub key: FlightKey,
    /// Resolved status; `Unknown` until a round finalizes.
    pub status_code: StatusCode,
}

impl Flight {
    /// A new flight with unresolved status.
    #[must_use]
    pub fn new(key: FlightKey) -> Self {
        Self {
            key,
            status_code: StatusCode::Unknown,
        }
    }
}
