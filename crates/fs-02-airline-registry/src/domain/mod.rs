//! # Domain Module
//!
//! Core domain types for the Airline Registry.

pub mod airline;
pub mod errors;

pub use airline::*;
pub use errors::*;
