//! # Adapter Implementations
//!
//! Concrete implementations of the outbound ports declared by the component
//! crates, backed by the in-process [`SuretyLedger`](crate::ledger::SuretyLedger).
//!
//! ```text
//! ┌──────────────┐   LedgerGateway    ┌────────────────────┐
//! │ OracleAgent  │ ─────────────────► │ LocalLedgerGateway │
//! │ (fs-06)      │                    │                    │
//! └──────────────┘                    └─────────┬──────────┘
//!                                               │ caller = oracle
//!                                               ▼
//!                                     ┌────────────────────┐
//!                                     │    SuretyLedger    │
//!                                     └────────────────────┘
//! ```

pub mod gateway;

pub use gateway::LocalLedgerGateway;
