//! # FS-02 Airline Registry
//!
//! Admission control for airline identities.
//!
//! **Component ID:** 2
//! **Architecture:** Hexagonal (domain + registry service)
//!
//! ## Admission Rules
//!
//! | Registered airlines | Effect of `register(candidate)` by a funded member |
//! |---------------------|-----------------------------------------------------|
//! | fewer than 4        | candidate is Registered immediately                 |
//! | 4 or more           | caller's vote is recorded; Registered at `ceil(n/2)` |
//!
//! An airline must deposit the funding minimum before it may vote, nominate,
//! or register flights.
//!
//! ```text
//! Unregistered ──(direct)──────────────→ Registered ──fund──→ Funded
//!      │                                     ↑
//!      └──(vote)──→ PendingVotes ──quorum────┘
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! fs-02-airline-registry/
//! ├── domain/          # Airline, AirlineState, AdmissionConfig, AirlineError
//! └── registry.rs      # AirlineRegistry state machine
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod registry;

// Re-exports
pub use domain::{
    Admission, AdmissionConfig, Airline, AirlineError, AirlineResult, AirlineState,
};
pub use registry::AirlineRegistry;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
