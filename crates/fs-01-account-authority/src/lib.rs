//! # FS-01 Account Authority
//!
//! Permission gate for every state-mutating registry operation.
//!
//! **Component ID:** 1
//! **Architecture:** Hexagonal (domain only, no outbound ports)
//!
//! ## Purpose
//!
//! The registries (airlines, flights, oracles, insurance) never check
//! permissions themselves. Instead every mutating entry point takes an
//! [`AuthorizedCaller`], and the only way to obtain one is
//! [`AccountAuthority::capability`]. An identity the owner has not
//! authorized, or any identity while the authority is paused, cannot
//! mutate anything.
//!
//! ```text
//! owner ──authorize(app)──→ AccountAuthority
//!                                │ capability(app)
//!                                ↓
//!                        AuthorizedCaller ──→ AirlineRegistry / FlightRegistry / ...
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! fs-01-account-authority/
//! └── domain/          # AccountAuthority, AuthorizedCaller, AuthorityError
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;

// Re-exports
pub use domain::{AccountAuthority, AuthorityError, AuthorityResult, AuthorizedCaller};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
