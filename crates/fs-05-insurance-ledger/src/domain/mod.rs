//! # Domain Module
//!
//! Core domain types for the Insurance Ledger.

pub mod errors;
pub mod policy;

pub use errors::*;
pub use policy::*;
