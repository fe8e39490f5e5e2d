//! # Consensus Engine
//!
//! Owns the oracle roster and every round. All mutating entry points take
//! the authority's capability token; caller eligibility that depends on
//! other registries (a funded airline requesting status) is decided by the
//! application before it calls in here.

use crate::domain::{
    Attestation, ConsensusConfig, ConsensusRound, OracleError, OracleParticipant, OracleResult,
    RoundKey,
};
use crate::ports::EntropySource;
use fs_01_account_authority::AuthorizedCaller;
use serde::{Deserialize, Serialize};
use shared_types::{Amount, FlightKey, Identity, StatusCode, ORACLE_INDEX_COUNT};
use std::collections::HashMap;
use tracing::{debug, info};


/// Oracle roster plus round tallies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsensusEngine {
    oracles: HashMap<Identity, OracleParticipant>,
    rounds: HashMap<RoundKey, ConsensusRound>,
    nonce: u64,
    config: ConsensusConfig,
}

impl ConsensusEngine {
    /// Create an engine with no oracles and no rounds.
    #[must_use]
    pub fn new(config: ConsensusConfig) -> Self {
        Self {
            oracles: HashMap::new(),
            rounds: HashMap::new(),
            nonce: 0,
            config,
        }
    }

    /// Add `identity` to the roster and assign its indexes.
    ///
    /// # Errors
    ///
    /// - `InsufficientFee` if `fee` is below the registration fee
    /// - `AlreadyRegistered` if `identity` is on the roster
    pub fn register_oracle(
        &mut self,
        gate: &AuthorizedCaller,
        identity: Identity,
        fee: Amount,
        entropy: &mut dyn EntropySource,
    ) -> OracleResult<[u8; ORACLE_INDEX_COUNT]> {
        self.check_registration(identity, fee)?;

        let mut indexes = [0u8; ORACLE_INDEX_COUNT];
        for slot in &mut indexes {
            *slot = self.draw_index(&identity, entropy);
        }

        self.oracles
            .insert(identity, OracleParticipant { identity, indexes });
        info!(
            oracle = %identity,
            ?indexes,
            roster = self.oracles.len(),
            via = %gate.identity().short(),
            "Oracle registered"
        );
        Ok(indexes)
    }

    /// Validate a registration without drawing indexes.
    ///
    /// # Errors
    ///
    /// Same as [`ConsensusEngine::register_oracle`].
    pub fn check_registration(&self, identity: Identity, fee: Amount) -> OracleResult<()> {
        if fee < self.config.registration_fee {
            return Err(OracleError::InsufficientFee {
                provided: fee,
                required: self.config.registration_fee,
            });
        }
        if self.oracles.contains_key(&identity) {
            return Err(OracleError::AlreadyRegistered(identity));
        }
        Ok(())
    }

    /// Indexes assigned to `identity`.
    ///
    /// # Errors
    ///
    /// `NotRegistered` if `identity` is not on the roster.
    pub fn get_my_indexes(&self, identity: &Identity) -> OracleResult<[u8; ORACLE_INDEX_COUNT]> {
        self.oracles
            .get(identity)
            .map(|o| o.indexes)
            .ok_or(OracleError::NotRegistered(*identity))
    }

    /// Whether `identity` is on the roster.
    #[must_use]
    pub fn is_oracle_registered(&self, identity: &Identity) -> bool {
        self.oracles.contains_key(identity)
    }

    /// Open (or reuse) a round for `flight` under a freshly drawn index.
    ///
    /// An existing round with the drawn key is returned untouched, finalized
    /// or not.
    pub fn request_status(
        &mut self,
        gate: &AuthorizedCaller,
        flight: FlightKey,
        caller: Identity,
        entropy: &mut dyn EntropySource,
    ) -> RoundKey {
        let index = self.draw_index(&caller, entropy);
        let key = RoundKey::new(index, flight);

        if self.rounds.contains_key(&key) {
            debug!(round = %key, requester = %caller, "Reusing existing round");
        } else {
            self.rounds
                .insert(key.clone(), ConsensusRound::open(key.clone()));
            info!(round = %key, requester = %caller, via = %gate.identity().short(), "Round opened");
        }
        key
    }

    /// Count an attestation from `caller`.
    ///
    /// # Errors
    ///
    /// - `NotRegistered` if `caller` is not on the roster
    /// - `IndexNotAssigned` if `caller` does not hold `index`
    /// - `RoundNotFound` if no round was opened for the key
    /// - `RoundClosed` if the round already finalized
    /// - `DuplicateResponse` if `caller` already attested in the round
    ///
    /// A round that closes after another round resolved the same flight
    /// reports [`Attestation::Superseded`] instead of `Finalized`.
    pub fn submit_response(
        &mut self,
        gate: &AuthorizedCaller,
        index: u8,
        flight: FlightKey,
        status: StatusCode,
        caller: Identity,
    ) -> OracleResult<Attestation> {
        let oracle = self
            .oracles
            .get(&caller)
            .ok_or(OracleError::NotRegistered(caller))?;
        if !oracle.holds(index) {
            return Err(OracleError::IndexNotAssigned {
                oracle: caller,
                index,
            });
        }

        let settled = self.flight_settled(index, &flight);
        let key = RoundKey::new(index, flight);
        let round = self
            .rounds
            .get_mut(&key)
            .ok_or_else(|| OracleError::RoundNotFound(key.clone()))?;

        let outcome = match round.attest(caller, status, self.config.min_responses)? {
            Attestation::Finalized(resolved) if settled => Attestation::Superseded(resolved),
            other => other,
        };
        match outcome {
            Attestation::Finalized(resolved) => info!(
                round = %key,
                status = %resolved,
                responses = round.responses_for(resolved),
                via = %gate.identity().short(),
                "Round finalized"
            ),
            Attestation::Superseded(resolved) => info!(
                round = %key,
                status = %resolved,
                "Round finalized after flight was already resolved"
            ),
            Attestation::Recorded { responses } => debug!(
                round = %key,
                oracle = %caller,
                status = %status,
                responses,
                "Attestation recorded"
            ),
        }
        Ok(outcome)
    }

    /// Inspect a round.
    #[must_use]
    pub fn round(&self, key: &RoundKey) -> Option<&ConsensusRound> {
        self.rounds.get(key)
    }

    /// Rounds still accepting attestations.
    #[must_use]
    pub fn open_rounds(&self) -> usize {
        self.rounds.values().filter(|r| r.open).count()
    }

    /// Roster size.
    #[must_use]
    pub fn oracle_count(&self) -> usize {
        self.oracles.len()
    }

    /// Oracles holding `index`, in no particular order.
    #[must_use]
    pub fn holders_of(&self, index: u8) -> Vec<Identity> {
        self.oracles
            .values()
            .filter(|o| o.holds(index))
            .map(|o| o.identity)
            .collect()
    }

    /// Consensus parameters in force.
    #[must_use]
    pub fn config(&self) -> &ConsensusConfig {
        &self.config
    }

    // Whether a round under another index already finalized for `flight`.
    fn flight_settled(&self, index: u8, flight: &FlightKey) -> bool {
        (0..self.config.index_range)
            .filter(|other| *other != index)
            .any(|other| {
                self.rounds
                    .get(&RoundKey::new(other, flight.clone()))
                    .is_some_and(|round| round.finalized)
            })
    }

    fn draw_index(&mut self, caller: &Identity, entropy: &mut dyn EntropySource) -> u8 {
        let nonce = self.nonce;
        self.nonce = self.nonce.wrapping_add(1);
        entropy.next_index(caller, nonce, self.config.index_range)
    }
}
