//! Committed ledger state.

use super::accounts::Accounts;
use crate::container::ProtocolConfig;
use fs_01_account_authority::AccountAuthority;
use fs_02_airline_registry::AirlineRegistry;
use fs_03_flight_registry::FlightRegistry;
use fs_04_oracle_consensus::ConsensusEngine;
use fs_05_insurance_ledger::InsuranceLedger;
use serde::{Deserialize, Serialize};
use shared_types::Identity;

/// Everything a transaction may touch.
///
/// Transactions mutate it in place after all of their checks pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerState {
    /// Gatekeeper.
    pub authority: AccountAuthority,
    /// Airline membership.
    pub airlines: AirlineRegistry,
    /// Flight catalog.
    pub flights: FlightRegistry,
    /// Oracle roster and rounds.
    pub consensus: ConsensusEngine,
    /// Policies and payout pool.
    pub insurance: InsuranceLedger,
    /// External balances.
    pub accounts: Accounts,
}

impl LedgerState {
    /// Empty state owned by `owner`.
    #[must_use]
    pub fn new(owner: Identity, protocol: &ProtocolConfig) -> Self {
        Self {
            authority: AccountAuthority::new(owner),
            airlines: AirlineRegistry::new(protocol.admission()),
            flights: FlightRegistry::new(),
            consensus: ConsensusEngine::new(protocol.consensus()),
            insurance: InsuranceLedger::new(protocol.insurance()),
            accounts: Accounts::new(),
        }
    }
}
