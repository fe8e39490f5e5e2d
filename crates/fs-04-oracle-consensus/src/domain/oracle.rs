//! Oracle roster entries and consensus parameters.

use serde::{Deserialize, Serialize};
use shared_types::{
    Amount, Identity, INDEX_RANGE, MIN_RESPONSES, ORACLE_INDEX_COUNT, REGISTRATION_FEE,
};

/// A registered oracle and the indexes it answers for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleParticipant {
    /// Oracle account.
    pub identity: Identity,
    /// Assigned at registration; may repeat; never changes.
    pub indexes: [u8; ORACLE_INDEX_COUNT],
}

impl OracleParticipant {
    /// Whether this oracle may attest under `index`.
    #[must_use]
    pub fn holds(&self, index: u8) -> bool {
        self.indexes.contains(&index)
    }
}

/// Consensus parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusConfig {
    /// Minimum fee to join the roster.
    pub registration_fee: Amount,
    /// Matching attestations needed to finalize.
    pub min_responses: usize,
    /// Indexes are drawn from `[0, index_range)`.
    pub index_range: u8,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            registration_fee: REGISTRATION_FEE,
            min_responses: MIN_RESPONSES,
            index_range: INDEX_RANGE,
        }
    }
}
