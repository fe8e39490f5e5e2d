//! # Adapters

pub mod status;

pub use status::{FixedStatusSource, RandomStatusSource};
