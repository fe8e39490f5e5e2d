//! # FS-03 Flight Registry
//!
//! Catalog of flights keyed by `(airline, designator, timestamp)`.
//!
//! **Component ID:** 3
//!
//! A flight is created once with status `Unknown`. The only later write is
//! the status recorded when an oracle round finalizes, and that write
//! happens at most once per flight. There is no update or delete.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod registry;

// Re-exports
pub use domain::{Flight, FlightError, FlightResult};
pub use registry::FlightRegistry;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
