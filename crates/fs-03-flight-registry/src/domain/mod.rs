//! # Domain Module

pub mod errors;
pub mod flight;

pub use errors::*;
pub use flight::*;
