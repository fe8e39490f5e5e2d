//! Bounded retry with exponential backoff for gateway calls.

use crate::config::AgentConfig;
use crate::ports::{GatewayError, GatewayResult};
use std::future::Future;
use tokio::sync::watch;
use tracing::warn;

/// Run `call` until it succeeds, fails permanently, or runs out of attempts.
///
/// Only [`GatewayError::Transport`] is retried. A shutdown signal during a
/// backoff sleep abandons the call with the last error.
pub(crate) async fn with_retry<T, F, Fut>(
    config: &AgentConfig,
    shutdown: &mut watch::Receiver<bool>,
    operation: &'static str,
    mut call: F,
) -> GatewayResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = GatewayResult<T>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1u32;
    loop {
        let error: GatewayError = match call().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !error.is_transient() || attempt >= max_attempts {
            return Err(error);
        }

        let delay = config.backoff_delay(attempt);
        warn!(
            operation,
            attempt,
            max_attempts,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Gateway call failed, retrying"
        );

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.changed() => return Err(error),
        }
        attempt += 1;
    }
}
