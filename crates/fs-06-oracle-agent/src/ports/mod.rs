//! # Ports
//!
//! - [`LedgerGateway`]: everything the agent needs from the ledger
//! - [`StatusSource`]: where attested statuses come from

pub mod gateway;
pub mod status;

pub use gateway::*;
pub use status::*;
