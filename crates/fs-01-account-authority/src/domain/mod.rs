//! # Domain Module
//!
//! Core domain types for the Account Authority.

pub mod authority;
pub mod errors;

pub use authority::*;
pub use errors::*;
