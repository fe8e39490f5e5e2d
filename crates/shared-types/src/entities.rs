//! # Core Domain Entities
//!
//! Defines the values every surety component speaks in.
//!
//! ## Clusters
//!
//! - **Accounts**: [`Identity`], [`Amount`]
//! - **Flights**: [`FlightKey`], [`StatusCode`]
//! - **Insurance**: [`PolicyKey`]

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// CLUSTER A: ACCOUNTS
// =============================================================================

/// A 32-byte Keccak-256 digest.
pub type Hash = [u8; 32];

/// Value in the smallest ledger unit (wei).
pub type Amount = u128;

/// One ether expressed in wei.
pub const ETHER: Amount = 1_000_000_000_000_000_000;

/// Convenience: `n` whole ether in wei.
#[must_use]
pub const fn ether(n: u128) -> Amount {
    n * ETHER
}

/// A 20-byte account address identifying the sender of a ledger call.
///
/// Airlines, passengers, oracles, the owner and the application itself are
/// all identified this way; the role is determined by registry state, never
/// by the identity value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Identity(pub [u8; 20]);

impl Identity {
    /// Wrap raw address bytes.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Build an identity whose low 8 bytes hold `n` (big-endian).
    ///
    /// Handy for deterministic account sets, the way test networks hand out
    /// sequential accounts.
    #[must_use]
    pub fn from_low_u64(n: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&n.to_be_bytes());
        Self(bytes)
    }

    /// Raw address bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// First four bytes as hex, for compact log fields.
    #[must_use]
    pub fn short(&self) -> String {
        format!("0x{}", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({self})")
    }
}

/// Errors from parsing an [`Identity`] out of hex text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityParseError {
    /// Input was not valid hex.
    #[error("invalid hex in identity: {0}")]
    InvalidHex(String),

    /// Input decoded to the wrong number of bytes.
    #[error("identity must be 20 bytes, got {0}")]
    InvalidLength(usize),
}

impl FromStr for Identity {
    type Err = IdentityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes =
            hex::decode(stripped).map_err(|e| IdentityParseError::InvalidHex(e.to_string()))?;
        let array: [u8; 20] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| IdentityParseError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }
}

// =============================================================================
// CLUSTER B: FLIGHTS
// =============================================================================

/// Composite key of a flight: operating airline, designator, scheduled time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlightKey {
    /// Operating airline.
    pub airline: Identity,
    /// Flight designator, e.g. `"ND1309"`.
    pub designator: String,
    /// Scheduled departure (unix seconds).
    pub timestamp: u64,
}

impl FlightKey {
    /// Create a flight key.
    pub fn new(airline: Identity, designator: impl Into<String>, timestamp: u64) -> Self {
        Self {
            airline,
            designator: designator.into(),
            timestamp,
        }
    }

    /// Keccak-256 over `airline ‖ designator ‖ timestamp(be)`.
    #[must_use]
    pub fn digest(&self) -> Hash {
        let mut hasher = Keccak256::new();
        hasher.update(self.airline.as_bytes());
        hasher.update(self.designator.as_bytes());
        hasher.update(self.timestamp.to_be_bytes());
        keccak_finalize(hasher)
    }
}

impl fmt::Display for FlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}/{}", self.designator, self.timestamp, self.airline.short())
    }
}

/// Delay status of a flight as resolved by oracle consensus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum StatusCode {
    /// No resolution yet.
    #[default]
    Unknown = 0,
    /// Departed on schedule.
    OnTime = 1,
    /// Late through the airline's fault. The only insurable outcome.
    LateAirline = 2,
    /// Late due to weather.
    LateWeather = 3,
    /// Late due to a technical issue.
    LateTechnical = 4,
    /// Late for any other reason.
    LateOther = 5,
}

impl StatusCode {
    /// All codes in wire order.
    pub const ALL: [StatusCode; 6] = [
        StatusCode::Unknown,
        StatusCode::OnTime,
        StatusCode::LateAirline,
        StatusCode::LateWeather,
        StatusCode::LateTechnical,
        StatusCode::LateOther,
    ];

    /// Wire value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// True when the airline is at fault and policies pay out.
    #[must_use]
    pub const fn is_airline_fault(self) -> bool {
        matches!(self, StatusCode::LateAirline)
    }

    /// True once a round has produced a resolution.
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        !matches!(self, StatusCode::Unknown)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusCode::Unknown => "STATUS_CODE_UNKNOWN",
            StatusCode::OnTime => "STATUS_CODE_ON_TIME",
            StatusCode::LateAirline => "STATUS_CODE_LATE_AIRLINE",
            StatusCode::LateWeather => "STATUS_CODE_LATE_WEATHER",
            StatusCode::LateTechnical => "STATUS_CODE_LATE_TECHNICAL",
            StatusCode::LateOther => "STATUS_CODE_LATE_OTHER",
        };
        f.write_str(name)
    }
}

/// Raised when a wire value does not name a status code.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("unknown status code value: {0}")]
pub struct InvalidStatusCode(pub u8);

impl TryFrom<u8> for StatusCode {
    type Error = InvalidStatusCode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        StatusCode::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(InvalidStatusCode(value))
    }
}

impl From<StatusCode> for u8 {
    fn from(code: StatusCode) -> Self {
        code.as_u8()
    }
}

// =============================================================================
// CLUSTER C: INSURANCE
// =============================================================================

/// Key of an insurance policy: one passenger on one flight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyKey {
    /// Insured passenger.
    pub passenger: Identity,
    /// Insured flight.
    pub flight: FlightKey,
}

impl PolicyKey {
    /// Create a policy key.
    #[must_use]
    pub fn new(passenger: Identity, flight: FlightKey) -> Self {
        Self { passenger, flight }
    }
}

impl fmt::Display for PolicyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.passenger.short(), self.flight)
    }
}

// =============================================================================
// HASHING
// =============================================================================

/// Keccak-256 of `data`.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    keccak_finalize(hasher)
}

fn keccak_finalize(hasher: Keccak256) -> Hash {
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_display_and_parse() {
        let id = Identity::from_low_u64(0xABCD);
        let text = id.to_string();
        assert!(text.starts_with("0x"));
        assert!(text.ends_with("abcd"));
        assert_eq!(text.parse::<Identity>().unwrap(), id);
    }

    #[test]
    fn test_identity_parse_rejects_wrong_length() {
        let err = "0x1234".parse::<Identity>().unwrap_err();
        assert_eq!(err, IdentityParseError::InvalidLength(2));
    }

    #[test]
    fn test_identity_parse_rejects_bad_hex() {
        assert!(matches!(
            "0xzz".parse::<Identity>(),
            Err(IdentityParseError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_status_code_wire_values() {
        assert_eq!(StatusCode::Unknown.as_u8(), 0);
        assert_eq!(StatusCode::LateAirline.as_u8(), 2);
        assert_eq!(StatusCode::try_from(5).unwrap(), StatusCode::LateOther);
        assert_eq!(StatusCode::try_from(6), Err(InvalidStatusCode(6)));
    }

    #[test]
    fn test_only_late_airline_is_airline_fault() {
        let faults: Vec<_> = StatusCode::ALL
            .iter()
            .filter(|s| s.is_airline_fault())
            .collect();
        assert_eq!(faults, vec![&StatusCode::LateAirline]);
    }

    #[test]
    fn test_flight_key_digest_distinguishes_fields() {
        let airline = Identity::from_low_u64(1);
        let a = FlightKey::new(airline, "ND1309", 100);
        let b = FlightKey::new(airline, "ND1309", 101);
        let c = FlightKey::new(Identity::from_low_u64(2), "ND1309", 100);
        assert_eq!(a.digest(), a.clone().digest());
        assert_ne!(a.digest(), b.digest());
        assert_ne!(a.digest(), c.digest());
    }

    #[test]
    fn test_flight_key_serde() {
        let key = FlightKey::new(Identity::from_low_u64(7), "SU-6056", 1_700_000_000);
        let json = serde_json::to_string(&key).unwrap();
        let back: FlightKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_ether_helper() {
        assert_eq!(ether(10), 10 * ETHER);
    }
}
