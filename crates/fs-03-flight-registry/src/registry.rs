//! # Flight Registry

use crate::domain::{Flight, FlightError, FlightResult};
use fs_01_account_authority::AuthorizedCaller;
use serde::{Deserialize, Serialize};
use shared_types::{FlightKey, StatusCode};
use std::collections::HashMap;
use tracing::{debug, info};

/// Registry of flights. Owns the flight key space exclusively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightRegistry {
    flights: HashMap<FlightKey, Flight>,
}

impl FlightRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flight with `Unknown` status.
    ///
    /// # Errors
    ///
    /// `AlreadyRegistered` if the key exists.
    pub fn register_flight(&mut self, gate: &AuthorizedCaller, key: FlightKey) -> FlightResult<()> {
        if self.flights.contains_key(&key) {
            return Err(FlightError::AlreadyRegistered(key));
        }
        info!(flight = %key, via = %gate.identity().short(), "Flight registered");
        self.flights.insert(key.clone(), Flight::new(key));
        Ok(())
    }

    /// Whether `key` is in the catalog.
    #[must_use]
    pub fn is_flight_registered(&self, key: &FlightKey) -> bool {
        self.flights.contains_key(key)
    }

    /// Resolved status of a flight.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown key.
    pub fn status_code(&self, key: &FlightKey) -> FlightResult<StatusCode> {
        self.flights
            .get(key)
            .map(|f| f.status_code)
            .ok_or_else(|| FlightError::NotFound(key.clone()))
    }

    /// Flight record, if registered.
    #[must_use]
    pub fn get(&self, key: &FlightKey) -> Option<&Flight> {
        self.flights.get(key)
    }

    /// Record the status produced by a finalized round.
    ///
    /// Write-once: returns `false` and leaves the flight untouched when a
    /// status is already resolved or `status` itself is `Unknown`.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown key.
    pub fn record_status(
        &mut self,
        gate: &AuthorizedCaller,
        key: &FlightKey,
        status: StatusCode,
    ) -> FlightResult<bool> {
        let flight = self
            .flights
            .get_mut(key)
            .ok_or_else(|| FlightError::NotFound(key.clone()))?;

        if flight.status_code.is_resolved() || !status.is_resolved() {
            debug!(
                flight = %key,
                current = %flight.status_code,
                proposed = %status,
                "Status already settled, ignoring"
            );
            return Ok(false);
        }

        flight.status_code = status;
        info!(flight = %key, status = %status, via = %gate.identity().short(), "Flight status recorded");
        Ok(true)
    }

    /// Number of registered flights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    /// True when no flight is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}
