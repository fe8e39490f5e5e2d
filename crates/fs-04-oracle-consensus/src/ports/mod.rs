//! # Ports
//!
//! Outbound dependencies of the consensus engine.

pub mod outbound;

pub use outbound::*;
