//! # Entropy Adapters
//!
//! `KeccakEntropy` derives indexes the way a ledger contract does, hashing
//! unpredictable bytes together with the nonce and caller:
//!
//! ```text
//! index = keccak256(entropy[32] ‖ nonce(be) ‖ caller[20]) mod range
//! ```

use crate::ports::EntropySource;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use sha3::{Digest, Keccak256};
use shared_types::Identity;

/// Production entropy: Keccak-256 over platform randomness, nonce and caller.
#[derive(Debug)]
pub struct KeccakEntropy<R: RngCore = StdRng> {
    rng: R,
}

impl KeccakEntropy<StdRng> {
    /// Seed from the operating system.
    #[must_use]
    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible stream for simulations.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: RngCore> KeccakEntropy<R> {
    /// Wrap an arbitrary generator.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore + Send> EntropySource for KeccakEntropy<R> {
    fn next_index(&mut self, caller: &Identity, nonce: u64, range: u8) -> u8 {
        if range == 0 {
            return 0;
        }

        let mut platform = [0u8; 32];
        self.rng.fill_bytes(&mut platform);

        let mut hasher = Keccak256::new();
        hasher.update(platform);
        hasher.update(nonce.to_be_bytes());
        hasher.update(caller.as_bytes());
        let digest = hasher.finalize();

        let mut word = [0u8; 8];
        word.copy_from_slice(&digest[24..32]);
        (u64::from_be_bytes(word) % u64::from(range)) as u8
    }
}

/// Deterministic entropy for tests: replays `values` in order, cycling.
#[derive(Debug, Clone)]
pub struct SequenceEntropy {
    values: Vec<u8>,
    position: usize,
}

impl SequenceEntropy {
    /// Replay `values`; an empty sequence always yields 0.
    #[must_use]
    pub fn new(values: impl Into<Vec<u8>>) -> Self {
        Self {
            values: values.into(),
            position: 0,
        }
    }

    /// Number of draws served so far.
    #[must_use]
    pub fn draws(&self) -> usize {
        self.position
    }
}

impl EntropySource for SequenceEntropy {
    fn next_index(&mut self, _caller: &Identity, _nonce: u64, range: u8) -> u8 {
        if self.values.is_empty() || range == 0 {
            return 0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value % range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_entropy_stays_in_range() {
        let mut entropy = KeccakEntropy::seeded(7);
        let caller = Identity::from_low_u64(42);
        for nonce in 0..500 {
            assert!(entropy.next_index(&caller, nonce, 10) < 10);
        }
    }

    #[test]
    fn test_keccak_entropy_covers_range() {
        let mut entropy = KeccakEntropy::seeded(11);
        let caller = Identity::from_low_u64(42);
        let mut seen = [false; 10];
        for nonce in 0..1_000 {
            seen[usize::from(entropy.next_index(&caller, nonce, 10))] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_keccak_entropy_reproducible_with_seed() {
        let caller = Identity::from_low_u64(42);
        let mut a = KeccakEntropy::seeded(3);
        let mut b = KeccakEntropy::seeded(3);
        let xs: Vec<u8> = (0..20).map(|n| a.next_index(&caller, n, 10)).collect();
        let ys: Vec<u8> = (0..20).map(|n| b.next_index(&caller, n, 10)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_sequence_entropy_cycles_and_reduces() {
        let caller = Identity::default();
        let mut entropy = SequenceEntropy::new(vec![1, 12, 3]);
        let draws: Vec<u8> = (0..5).map(|n| entropy.next_index(&caller, n, 10)).collect();
        assert_eq!(draws, vec![1, 2, 3, 1, 2]);
        assert_eq!(entropy.draws(), 5);
    }

    #[test]
    fn test_empty_sequence_yields_zero() {
        let mut entropy = SequenceEntropy::new(Vec::new());
        assert_eq!(entropy.next_index(&Identity::default(), 0, 10), 0);
    }
}
