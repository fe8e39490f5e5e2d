//! # Domain Module
//!
//! Core domain types for oracle consensus.

pub mod errors;
pub mod oracle;
pub mod round;

pub use errors::*;
pub use oracle::*;
pub use round::*;
