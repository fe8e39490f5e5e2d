//! # Shared Types Crate
//!
//! This crate contains the domain entities, protocol constants and the error
//! taxonomy shared by every surety component.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Owned Key Spaces**: Types here are plain values; each registry crate
//!   owns the mutable state keyed by them.
//! - **Stable Taxonomy**: Every component error maps onto one [`ErrorKind`]
//!   label so callers can react without matching on crate-specific enums.

pub mod entities;
pub mod errors;
pub mod protocol;

pub use entities::*;
pub use errors::*;
pub use protocol::*;
