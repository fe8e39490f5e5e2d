//! # Error Types
//!
//! The failure taxonomy shared by every surety component. Component crates
//! keep their own `thiserror` enums (carrying the offending entity) and map
//! each variant onto one [`ErrorKind`] label.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Taxonomy label of a failed ledger operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Caller is not permitted to perform the operation.
    Unauthorized,
    /// Entity already exists in its registry.
    AlreadyRegistered,
    /// Referenced entity or round does not exist.
    NotFound,
    /// Airline already voted for this candidate.
    DuplicateVote,
    /// Oracle already attested in this round.
    DuplicateResponse,
    /// Value attached to the call is below what the operation requires.
    InsufficientFunds,
    /// Preconditions for the operation are not met (e.g. status not payable).
    NotEligible,
    /// Policy was already paid out.
    AlreadyClaimed,
    /// Ledger is paused by its owner.
    NotOperational,
}

impl ErrorKind {
    /// Stable label used in logs and external error payloads.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::AlreadyRegistered => "AlreadyRegistered",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::DuplicateVote => "DuplicateVote",
            ErrorKind::DuplicateResponse => "DuplicateResponse",
            ErrorKind::InsufficientFunds => "InsufficientFunds",
            ErrorKind::NotEligible => "NotEligible",
            ErrorKind::AlreadyClaimed => "AlreadyClaimed",
            ErrorKind::NotOperational => "NotOperational",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
