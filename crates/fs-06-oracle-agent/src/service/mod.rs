//! # Oracle Agent Service

mod agent;
mod retry;


pub use agent::{AgentError, AgentHandle, AgentStats, OracleAgent};
