//! # Surety Node Library
//!
//! The ledger substrate and application facade of flight surety, and the
//! runtime that hosts it next to a fleet of oracle agents. The `main.rs`
//! binary is a thin shell over [`runtime::SuretyNode`].
//!
//! ## Layout
//!
//! - `ledger`: serialized, atomic transactions over the component registries
//! - `adapters`: port implementations backed by the in-process ledger
//! - `container`: configuration and environment overrides
//! - `runtime`: genesis and agent lifecycle

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod container;
pub mod ledger;
pub mod runtime;

pub use container::{load_config, NodeConfig};
pub use ledger::{LedgerError, LedgerResult, SuretyLedger};
pub use runtime::{NodeError, SuretyNode};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
