//! # FS-06 Oracle Agent
//!
//! Off-ledger attestor process. One agent runs per oracle identity.
//!
//! **Component ID:** 6
//! **Architecture:** Hexagonal (service + LedgerGateway port)
//!
//! ## Lifecycle
//!
//! ```text
//! start()
//!   ├─ is_oracle_registered? ──no──→ register_oracle(fee)
//!   ├─ get_my_indexes
//!   └─ subscribe_requests (from earliest)
//!         │
//!         ▼
//!   OracleRequest{index, flight}
//!         ├─ index not held ─────────→ ignore
//!         ├─ status already resolved ─→ skip
//!         └─ attest ──→ submit_oracle_response (retry on transport errors)
//!
//! stop() ──→ finish current event, close subscription, return stats
//! ```
//!
//! Agents never coordinate with each other. The consensus engine's
//! one-vote-per-round and finalize-once rules make the race between them
//! safe, so a rejection from the ledger is logged and dropped.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{FixedStatusSource, RandomStatusSource};
pub use config::AgentConfig;
pub use ports::{GatewayError, GatewayResult, LedgerGateway, StatusSource};
pub use service::{AgentError, AgentHandle, AgentStats, OracleAgent};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
