//! Status source - outbound port.

use shared_types::{FlightKey, StatusCode};

/// Produces the status an agent attests for a flight.
pub trait StatusSource: Send + Sync {
    /// Status to report for `flight` in the round opened under `index`.
    fn attest(&self, flight: &FlightKey, index: u8) -> StatusCode;
}
