//! Error types for the Insurance Ledger.

use shared_types::{Amount, ErrorKind, PolicyKey, StatusCode};
use thiserror::Error;

/// Insurance ledger errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InsuranceError {
    /// No value attached to the purchase.
    #[error("Premium must be greater than zero")]
    ZeroPremium,

    /// Premium exceeds the per-policy cap.
    #[error("Premium {premium} exceeds cap {cap}")]
    PremiumAboveCap {
        /// Offered premium.
        premium: Amount,
        /// Configured cap.
        cap: Amount,
    },

    /// Passenger already holds a policy on this flight.
    #[error("Policy {0} already exists")]
    AlreadyInsured(PolicyKey),

    /// No such policy.
    #[error("Policy {0} not found")]
    PolicyNotFound(PolicyKey),

    /// Policy already paid out.
    #[error("Policy {0} already claimed")]
    AlreadyClaimed(PolicyKey),

    /// Flight status does not entitle the passenger to a payout.
    #[error("Policy {key} not payable for status {status}")]
    NotPayable {
        /// The policy.
        key: PolicyKey,
        /// Resolved flight status.
        status: StatusCode,
    },

    /// Pool cannot cover the payout.
    #[error("Insurance pool holds {available}, payout needs {required}")]
    PoolExhausted {
        /// Payout amount.
        required: Amount,
        /// Pool balance.
        available: Amount,
    },
}

impl InsuranceError {
    /// Taxonomy label of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ZeroPremium | Self::PoolExhausted { .. } => ErrorKind::InsufficientFunds,
            Self::PremiumAboveCap { .. } | Self::NotPayable { .. } => ErrorKind::NotEligible,
            Self::AlreadyInsured(_) => ErrorKind::AlreadyRegistered,
            Self::PolicyNotFound(_) => ErrorKind::NotFound,
            Self::AlreadyClaimed(_) => ErrorKind::AlreadyClaimed,
        }
    }
}

/// Result type for insurance operations.
pub type InsuranceResult<T> = Result<T, InsuranceError>;
