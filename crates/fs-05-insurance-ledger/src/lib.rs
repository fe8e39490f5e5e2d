//! # FS-05 Insurance Ledger
//!
//! Passenger policies, premium escrow and the payout pool.
//!
//! **Component ID:** 5
//!
//! ## Rules
//!
//! - One policy per `(passenger, flight)`, premium in `(0, PREMIUM_CAP]`.
//! - A policy pays `premium × 3 / 2` exactly once, and only when the
//!   flight resolved as `LateAirline`.
//! - Payouts draw on a pool made of escrowed premiums plus airline funding.
//!
//! ## Module Structure
//!
//! ```text
//! fs-05-insurance-ledger/
//! ├── domain/          # Policy, InsuranceConfig, InsuranceError
//! └── ledger.rs        # InsuranceLedger
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod ledger;

// Re-exports
pub use domain::{InsuranceConfig, InsuranceError, InsuranceResult, Policy};
pub use ledger::InsuranceLedger;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
