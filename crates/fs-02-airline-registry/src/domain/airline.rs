//! # Airline Entities

use serde::{Deserialize, Serialize};
use shared_types::{Amount, Identity, ADMISSION_THRESHOLD, FUNDING_MINIMUM};
use std::collections::BTreeSet;

/// Lifecycle state of an airline identity.
///
/// Transitions only move forward: `Unregistered → PendingVotes → Registered
/// → Funded`, with `PendingVotes` skipped while the registry is small.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum AirlineState {
    /// Unknown to the registry.
    #[default]
    Unregistered,
    /// Nominated, collecting votes.
    PendingVotes,
    /// Admitted, not yet funded.
    Registered,
    /// Admitted and funded; may vote and operate flights.
    Funded,
}

impl AirlineState {
    /// Registered or Funded.
    #[must_use]
    pub const fn is_member(self) -> bool {
        matches!(self, Self::Registered | Self::Funded)
    }
}

/// An airline record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    /// Airline account.
    pub identity: Identity,
    /// Lifecycle state.
    pub state: AirlineState,
    /// Distinct supporters while `PendingVotes`; empty otherwise.
    pub votes: BTreeSet<Identity>,
}

impl Airline {
    /// A fresh, unregistered record.
    #[must_use]
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            state: AirlineState::Unregistered,
            votes: BTreeSet::new(),
        }
    }
}

/// Outcome of a `register` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Admission {
    /// Candidate is now Registered.
    Admitted,
    /// Vote recorded; candidate still pending.
    Pending {
        /// Distinct votes so far.
        votes: usize,
        /// Votes required at the current registry size.
        required: usize,
    },
    /// Candidate was already a member; nothing changed.
    AlreadyMember,
}

/// Admission parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// Below this many members, admission needs no vote.
    pub admission_threshold: usize,
    /// Minimum funding deposit.
    pub funding_minimum: Amount,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            admission_threshold: ADMISSION_THRESHOLD,
            funding_minimum: FUNDING_MINIMUM,
        }
    }
}
