//! # Outbound Ports

use shared_types::Identity;

/// Source of protocol randomness for index draws.
///
/// Implementations combine the caller, a nonce that never repeats within
/// one engine, and some entropy the caller cannot predict. They must never
/// read the wall clock.
pub trait EntropySource: Send {
    /// Draw one index in `[0, range)`.
    fn next_index(&mut self, caller: &Identity, nonce: u64, range: u8) -> u8;
}
