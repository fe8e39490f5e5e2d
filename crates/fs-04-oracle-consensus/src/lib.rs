//! # FS-04 Oracle Consensus
//!
//! Oracle roster, index shards and per-round attestation tallies.
//!
//! **Component ID:** 4
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Protocol
//!
//! Every oracle is assigned three indexes in `[0, INDEX_RANGE)` when it
//! registers. A status request picks one index at random and opens the round
//! keyed by `(index, flight)`. Only oracles holding that index may attest,
//! each at most once, and the first status to collect `MIN_RESPONSES`
//! matching attestations finalizes the round. A finalized round accepts
//! nothing further.
//!
//! ```text
//! request_status ──→ RoundKey(index K, flight) ──→ OracleRequest{K}
//!                                                       │
//!            oracles holding K ──submit_response────────┘
//!                                  │
//!                    tally[status] ≥ 3 ──→ Finalized(status)
//! ```
//!
//! ## Randomness
//!
//! Index draws go through the [`EntropySource`] port. Production uses
//! [`KeccakEntropy`] over platform entropy, the caller and a monotonic nonce;
//! tests inject a [`SequenceEntropy`].
//!
//! ## Module Structure
//!
//! ```text
//! fs-04-oracle-consensus/
//! ├── domain/          # OracleParticipant, RoundKey, ConsensusRound, OracleError
//! ├── ports/           # EntropySource
//! ├── adapters/        # KeccakEntropy, SequenceEntropy
//! └── service/         # ConsensusEngine
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{KeccakEntropy, SequenceEntropy};
pub use domain::{
    Attestation, ConsensusConfig, ConsensusRound, OracleError, OracleParticipant, OracleResult,
    RoundKey,
};
pub use ports::EntropySource;
pub use service::ConsensusEngine;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
