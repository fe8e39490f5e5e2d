//! # Adapters
//!
//! Entropy source implementations.

pub mod entropy;

pub use entropy::{KeccakEntropy, SequenceEntropy};
