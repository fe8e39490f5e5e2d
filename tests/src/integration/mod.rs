//! # Integration Scenarios
//!
//! Every scenario drives a real [`surety_node::SuretyLedger`]; oracle fleet
//! scenarios add real agents over the in-process gateway.

pub mod admission_consensus;
pub mod insurance_flow;
pub mod oracle_fleet;

use fs_04_oracle_consensus::SequenceEntropy;
use shared_bus::InMemoryEventBus;
use shared_types::{ether, Identity, FUNDING_MINIMUM};
use surety_node::container::ProtocolConfig;
use surety_node::SuretyLedger;

/// Scheduled departure used by every scenario.
pub const DEPARTURE: u64 = 1_700_000_000;

/// Authority owner.
pub fn owner() -> Identity {
    Identity::from_low_u64(1)
}

/// Application identity.
pub fn app() -> Identity {
    Identity::from_low_u64(2)
}

/// Airline `n`, counting from 1.
pub fn airline(n: u64) -> Identity {
    Identity::from_low_u64(10 + n - 1)
}

/// Oracle `n`, counting from 0.
pub fn oracle(n: u64) -> Identity {
    Identity::from_low_u64(1_000 + n)
}

/// Passenger `n`.
pub fn passenger(n: u64) -> Identity {
    Identity::from_low_u64(500 + n)
}

/// Index draws cycling 0..10, so oracle `k` holds `3k..3k+2` (mod 10).
pub fn cycling_entropy() -> SequenceEntropy {
    SequenceEntropy::new((0..10).collect::<Vec<u8>>())
}

/// Ledger with the app authorized and airline 1 admitted and funded.
pub async fn genesis_ledger(entropy: SequenceEntropy, bus: InMemoryEventBus) -> SuretyLedger {
    let ledger = SuretyLedger::new(
        owner(),
        app(),
        &ProtocolConfig::default(),
        bus,
        Box::new(entropy),
    );
    ledger.authorize_app(owner(), app()).await.unwrap();
    ledger.bootstrap_airline(owner(), airline(1)).await.unwrap();
    fund(&ledger, airline(1)).await;
    ledger
}

/// Deposit and pay the funding minimum for `airline`.
pub async fn fund(ledger: &SuretyLedger, airline: Identity) {
    ledger.deposit(airline, ether(50)).await;
    assert!(ledger.fund_airline(airline, FUNDING_MINIMUM).await.unwrap());
}
