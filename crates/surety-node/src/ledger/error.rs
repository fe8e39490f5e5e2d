//! Ledger error aggregate.

use fs_01_account_authority::AuthorityError;
use fs_02_airline_registry::AirlineError;
use fs_03_flight_registry::FlightError;
use fs_04_oracle_consensus::OracleError;
use fs_05_insurance_ledger::InsuranceError;
use shared_types::{Amount, ErrorKind, Identity};
use thiserror::Error;

/// Any failure of a ledger call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Gatekeeping failure.
    #[error(transparent)]
    Authority(#[from] AuthorityError),

    /// Admission failure.
    #[error(transparent)]
    Airline(#[from] AirlineError),

    /// Flight catalog failure.
    #[error(transparent)]
    Flight(#[from] FlightError),

    /// Oracle roster or round failure.
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// Policy or payout failure.
    #[error(transparent)]
    Insurance(#[from] InsuranceError),

    /// The caller cannot cover the value sent with the call.
    #[error("Account {account} holds {balance}, call requires {required}")]
    InsufficientBalance {
        /// Debited account.
        account: Identity,
        /// Its balance.
        balance: Amount,
        /// Value required.
        required: Amount,
    },

    /// Only funded airlines may operate flights.
    #[error("Airline {0} is not funded")]
    AirlineNotFunded(Identity),

    /// Status requests come from funded airlines or the owner.
    #[error("{0} may not request flight status")]
    RequesterNotAllowed(Identity),
}

impl LedgerError {
    /// Taxonomy label.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authority(e) => e.kind(),
            Self::Airline(e) => e.kind(),
            Self::Flight(e) => e.kind(),
            Self::Oracle(e) => e.kind(),
            Self::Insurance(e) => e.kind(),
            Self::InsufficientBalance { .. } => ErrorKind::InsufficientFunds,
            Self::AirlineNotFunded(_) | Self::RequesterNotAllowed(_) => ErrorKind::Unauthorized,
        }
    }
}

/// Result type for ledger calls.
pub type LedgerResult<T> = Result<T, LedgerError>;
