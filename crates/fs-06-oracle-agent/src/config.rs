//! # Agent Configuration

use serde::{Deserialize, Serialize};
use shared_types::{Amount, REGISTRATION_FEE};
use std::time::Duration;

/// Default attempts per ledger call before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default base delay for exponential backoff.
pub const DEFAULT_BASE_BACKOFF_MS: u64 = 200;

/// Default ceiling on a single backoff delay.
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 10_000;

/// Default resubscription attempts after the event stream closes.
pub const DEFAULT_MAX_RESUBSCRIBE_ATTEMPTS: u32 = 10;

/// Oracle agent tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Fee attached to the registration call.
    pub registration_fee: Amount,
    /// Attempts per ledger call when the failure is transient.
    pub max_attempts: u32,
    /// Base backoff delay in milliseconds.
    pub base_backoff_ms: u64,
    /// Maximum backoff delay in milliseconds.
    pub max_backoff_ms: u64,
    /// Consecutive resubscription attempts before the agent stops.
    pub max_resubscribe_attempts: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            registration_fee: REGISTRATION_FEE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff_ms: DEFAULT_BASE_BACKOFF_MS,
            max_backoff_ms: DEFAULT_MAX_BACKOFF_MS,
            max_resubscribe_attempts: DEFAULT_MAX_RESUBSCRIBE_ATTEMPTS,
        }
    }
}

impl AgentConfig {
    /// Delay before retry number `attempt` (1-based).
    ///
    /// `min(base · 2^min(attempt, 6), max)`
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let millis = std::cmp::min(
            self.base_backoff_ms.saturating_mul(1 << attempt.min(6)),
            self.max_backoff_ms,
        );
        Duration::from_millis(millis)
    }
}
