//! # Airline Registry
//!
//! The admission state machine. Owns the airline key space exclusively.

use crate::domain::{Admission, AdmissionConfig, Airline, AirlineError, AirlineResult, AirlineState};
use fs_01_account_authority::AuthorizedCaller;
use serde::{Deserialize, Serialize};
use shared_types::{required_votes, Amount, Identity};
use std::collections::HashMap;
use tracing::{debug, info};

/// Registry of airline identities and their admission state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AirlineRegistry {
    airlines: HashMap<Identity, Airline>,
    bootstrapped: bool,
    config: AdmissionConfig,
}

impl AirlineRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new(config: AdmissionConfig) -> Self {
        Self {
            airlines: HashMap::new(),
            bootstrapped: false,
            config,
        }
    }

    /// Seed the registry with its first airline, admitted without a vote.
    ///
    /// # Errors
    ///
    /// `AlreadyBootstrapped` on any call after the first.
    pub fn bootstrap(&mut self, gate: &AuthorizedCaller, identity: Identity) -> AirlineResult<()> {
        if self.bootstrapped {
            return Err(AirlineError::AlreadyBootstrapped(identity));
        }
        self.bootstrapped = true;
        self.admit(identity);
        info!(airline = %identity, via = %gate.identity().short(), "First airline bootstrapped");
        Ok(())
    }

    /// Nominate or vote for `candidate` on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// - `NotRegistered` / `NotFunded` if `caller` may not vote
    /// - `DuplicateVote` if `caller` already supports `candidate`
    pub fn register(
        &mut self,
        gate: &AuthorizedCaller,
        candidate: Identity,
        caller: Identity,
    ) -> AirlineResult<Admission> {
        match self.state_of(&caller) {
            AirlineState::Funded => {}
            AirlineState::Registered => return Err(AirlineError::NotFunded(caller)),
            _ => return Err(AirlineError::NotRegistered(caller)),
        }

        if self.state_of(&candidate).is_member() {
            debug!(candidate = %candidate, "Candidate already a member");
            return Ok(Admission::AlreadyMember);
        }

        let registered = self.registered_count();
        if registered < self.config.admission_threshold {
            self.admit(candidate);
            info!(
                candidate = %candidate,
                sponsor = %caller,
                registered = registered + 1,
                via = %gate.identity().short(),
                "Airline admitted directly"
            );
            return Ok(Admission::Admitted);
        }

        let required = required_votes(registered);
        if self
            .airlines
            .get(&candidate)
            .is_some_and(|record| record.votes.contains(&caller))
        {
            return Err(AirlineError::DuplicateVote {
                voter: caller,
                candidate,
            });
        }
        let record = self
            .airlines
            .entry(candidate)
            .or_insert_with(|| Airline::new(candidate));
        record.state = AirlineState::PendingVotes;
        record.votes.insert(caller);

        let votes = record.votes.len();
        if votes >= required {
            self.admit(candidate);
            info!(
                candidate = %candidate,
                votes,
                required,
                "Airline admitted by vote"
            );
            Ok(Admission::Admitted)
        } else {
            debug!(
                candidate = %candidate,
                voter = %caller,
                votes,
                required,
                "Admission vote recorded"
            );
            Ok(Admission::Pending { votes, required })
        }
    }

    /// Record an airline's funding deposit.
    ///
    /// Returns `true` when this call moved the airline to Funded.
    ///
    /// # Errors
    ///
    /// - `NotRegistered` unless `identity` is Registered or Funded
    /// - `InsufficientFunding` below the funding minimum
    pub fn fund(
        &mut self,
        gate: &AuthorizedCaller,
        identity: Identity,
        amount: Amount,
    ) -> AirlineResult<bool> {
        if !self.check_funding(identity, amount)? {
            return Ok(false);
        }
        let Some(record) = self.airlines.get_mut(&identity) else {
            return Err(AirlineError::NotRegistered(identity));
        };
        record.state = AirlineState::Funded;
        info!(airline = %identity, amount, via = %gate.identity().short(), "Airline funded");
        Ok(true)
    }

    /// Validate a funding deposit without applying it.
    ///
    /// Returns `false` when the airline is already funded.
    ///
    /// # Errors
    ///
    /// Same as [`AirlineRegistry::fund`].
    pub fn check_funding(&self, identity: Identity, amount: Amount) -> AirlineResult<bool> {
        if !self.is_registered(&identity) {
            return Err(AirlineError::NotRegistered(identity));
        }
        if amount < self.config.funding_minimum {
            return Err(AirlineError::InsufficientFunding {
                provided: amount,
                required: self.config.funding_minimum,
            });
        }
        Ok(!self.is_funded(&identity))
    }

    /// Registered or Funded.
    #[must_use]
    pub fn is_registered(&self, identity: &Identity) -> bool {
        self.state_of(identity).is_member()
    }

    /// Funded.
    #[must_use]
    pub fn is_funded(&self, identity: &Identity) -> bool {
        self.state_of(identity) == AirlineState::Funded
    }

    /// Number of airlines in Registered or Funded state.
    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.airlines
            .values()
            .filter(|a| a.state.is_member())
            .count()
    }

    /// Lifecycle state, `Unregistered` if unknown.
    #[must_use]
    pub fn state_of(&self, identity: &Identity) -> AirlineState {
        self.airlines
            .get(identity)
            .map_or(AirlineState::Unregistered, |a| a.state)
    }

    /// Distinct votes collected by a pending candidate.
    #[must_use]
    pub fn votes_for(&self, identity: &Identity) -> usize {
        self.airlines.get(identity).map_or(0, |a| a.votes.len())
    }

    /// Full record, if known.
    #[must_use]
    pub fn get(&self, identity: &Identity) -> Option<&Airline> {
        self.airlines.get(identity)
    }

    /// Admission parameters in force.
    #[must_use]
    pub fn config(&self) -> &AdmissionConfig {
        &self.config
    }

    fn admit(&mut self, identity: Identity) {
        let record = self
            .airlines
            .entry(identity)
            .or_insert_with(|| Airline::new(identity));
        record.state = AirlineState::Registered;
        record.votes.clear();
    }
}
