//! # Status Sources
//!
//! Without a real flight-data feed, agents report a coin flip between
//! `OnTime` and `LateAirline`.

use crate::ports::StatusSource;
use rand::Rng;
use shared_types::{FlightKey, StatusCode};

/// Placeholder attestations: `OnTime` or `LateAirline`, each with probability ½.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomStatusSource;

impl StatusSource for RandomStatusSource {
    fn attest(&self, _flight: &FlightKey, _index: u8) -> StatusCode {
        if rand::thread_rng().gen_bool(0.5) {
            StatusCode::OnTime
        } else {
            StatusCode::LateAirline
        }
    }
}

/// Always reports the same status.
#[derive(Debug, Clone, Copy)]
pub struct FixedStatusSource(pub StatusCode);

impl StatusSource for FixedStatusSource {
    fn attest(&self, _flight: &FlightKey, _index: u8) -> StatusCode {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Identity;

    fn flight() -> FlightKey {
        FlightKey::new(Identity::from_low_u64(1), "ND1309", 1)
    }

    #[test]
    fn test_random_source_only_reports_two_statuses() {
        let source = RandomStatusSource;
        let mut seen_on_time = false;
        let mut seen_late = false;
        for _ in 0..200 {
            match source.attest(&flight(), 0) {
                StatusCode::OnTime => seen_on_time = true,
                StatusCode::LateAirline => seen_late = true,
                other => panic!("unexpected status {other}"),
            }
        }
        assert!(seen_on_time && seen_late);
    }

    #[test]
    fn test_fixed_source() {
        let source = FixedStatusSource(StatusCode::LateWeather);
        assert_eq!(source.attest(&flight(), 3), StatusCode::LateWeather);
    }
}
