//! # Consensus Rounds
//!
//! One round per `(index, flight)`. The tally maps each attested status to
//! the set of oracles that reported it.

use super::errors::{OracleError, OracleResult};
use serde::{Deserialize, Serialize};
use shared_types::{FlightKey, Identity, StatusCode};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Key of a consensus round.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoundKey {
    /// Shard index the round was opened under.
    pub index: u8,
    /// Flight under resolution.
    pub flight: FlightKey,
}

impl RoundKey {
    /// Create a round key.
    #[must_use]
    pub fn new(index: u8, flight: FlightKey) -> Self {
        Self { index, flight }
    }
}

impl fmt::Display for RoundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}", self.index, self.flight)
    }
}

/// Result of an accepted attestation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attestation {
    /// Counted; the round is still open.
    Recorded {
        /// Attestations for the submitted status so far.
        responses: usize,
    },
    /// This attestation reached the threshold and closed the round.
    Finalized(StatusCode),
    /// The round closed, but another round had already resolved the same
    /// flight. The flight keeps its earlier status.
    Superseded(StatusCode),
}

/// Tally state of one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusRound {
    /// Round identity.
    pub key: RoundKey,
    /// Accepting attestations.
    pub open: bool,
    /// Oracles per attested status.
    pub tally: BTreeMap<StatusCode, BTreeSet<Identity>>,
    /// Set once, never cleared.
    pub finalized: bool,
    /// Status that reached the threshold.
    pub resolved_status: Option<StatusCode>,
}

impl ConsensusRound {
    /// Open a fresh round.
    #[must_use]
    pub fn open(key: RoundKey) -> Self {
        Self {
            key,
            open: true,
            tally: BTreeMap::new(),
            finalized: false,
            resolved_status: None,
        }
    }

    /// Whether `oracle` attested under any status.
    #[must_use]
    pub fn has_responded(&self, oracle: &Identity) -> bool {
        self.tally.values().any(|voters| voters.contains(oracle))
    }

    /// Attestations for one status.
    #[must_use]
    pub fn responses_for(&self, status: StatusCode) -> usize {
        self.tally.get(&status).map_or(0, BTreeSet::len)
    }

    /// Attestations across all statuses.
    #[must_use]
    pub fn total_responses(&self) -> usize {
        self.tally.values().map(BTreeSet::len).sum()
    }

    /// Count one attestation, finalizing when `status` reaches `min_responses`.
    ///
    /// # Errors
    ///
    /// - `RoundClosed` once finalized
    /// - `DuplicateResponse` if `oracle` already attested
    pub fn attest(
        &mut self,
        oracle: Identity,
        status: StatusCode,
        min_responses: usize,
    ) -> OracleResult<Attestation> {
        if !self.open || self.finalized {
            return Err(OracleError::RoundClosed(self.key.clone()));
        }
        if self.has_responded(&oracle) {
            return Err(OracleError::DuplicateResponse {
                oracle,
                round: self.key.clone(),
            });
        }

        let voters = self.tally.entry(status).or_default();
        voters.insert(oracle);
        let responses = voters.len();

        if responses >= min_responses {
            self.finalized = true;
            self.open = false;
            self.resolved_status = Some(status);
            Ok(Attestation::Finalized(status))
        } else {
            Ok(Attestation::Recorded { responses })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round() -> ConsensusRound {
        ConsensusRound::open(RoundKey::new(
            3,
            FlightKey::new(Identity::from_low_u64(1), "ND1309", 100),
        ))
    }

    fn oracle(n: u64) -> Identity {
        Identity::from_low_u64(1000 + n)
    }

    #[test]
    fn test_finalizes_on_third_matching_response() {
        let mut round = round();
        assert_eq!(
            round.attest(oracle(1), StatusCode::OnTime, 3).unwrap(),
            Attestation::Recorded { responses: 1 }
        );
        round.attest(oracle(2), StatusCode::LateAirline, 3).unwrap();
        round.attest(oracle(3), StatusCode::OnTime, 3).unwrap();
        assert!(round.open);

        assert_eq!(
            round.attest(oracle(4), StatusCode::OnTime, 3).unwrap(),
            Attestation::Finalized(StatusCode::OnTime)
        );
        assert!(round.finalized);
        assert!(!round.open);
        assert_eq!(round.resolved_status, Some(StatusCode::OnTime));
        assert_eq!(round.total_responses(), 4);
    }

    #[test]
    fn test_one_vote_per_oracle_across_statuses() {
        let mut round = round();
        round.attest(oracle(1), StatusCode::OnTime, 3).unwrap();
        let err = round
            .attest(oracle(1), StatusCode::LateAirline, 3)
            .unwrap_err();
        assert!(matches!(err, OracleError::DuplicateResponse { .. }));
        assert_eq!(round.responses_for(StatusCode::LateAirline), 0);
    }

    #[test]
    fn test_closed_round_is_inert() {
        let mut round = round();
        for n in 1..=3 {
            round.attest(oracle(n), StatusCode::OnTime, 3).unwrap();
        }
        let snapshot = round.clone();

        let err = round
            .attest(oracle(9), StatusCode::LateAirline, 3)
            .unwrap_err();
        assert_eq!(err, OracleError::RoundClosed(round.key.clone()));
        assert_eq!(round, snapshot);
    }

    #[test]
    fn test_round_key_display() {
        assert!(round().key.to_string().starts_with("#3:ND1309@100/"));
    }
}
