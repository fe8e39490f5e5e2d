//! # Oracle Agent
//!
//! Startup runs on the caller's task so registration failures surface
//! directly from [`OracleAgent::start`]. The event loop then runs on its own
//! task until [`AgentHandle::stop`] is called.

use super::retry::with_retry;
use crate::config::AgentConfig;
use crate::ports::{GatewayError, LedgerGateway, StatusSource};
use serde::{Deserialize, Serialize};
use shared_bus::{LoggedEvent, Subscription, SubscriptionError, SuretyEvent};
use shared_types::{FlightKey, Identity, ORACLE_INDEX_COUNT};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Errors that end an agent.
#[derive(Debug, Error)]
pub enum AgentError {
    /// A startup call failed permanently.
    #[error("Agent startup failed during {operation}: {source}")]
    Startup {
        /// The failing call.
        operation: &'static str,
        /// Gateway failure.
        #[source]
        source: GatewayError,
    },

    /// The event stream could not be re-established.
    #[error("Event stream lost after {attempts} resubscription attempts")]
    StreamLost {
        /// Attempts made.
        attempts: u32,
    },

    /// The agent task panicked or was aborted.
    #[error("Agent task failed: {0}")]
    Task(String),
}

/// Counters reported when an agent stops.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStats {
    /// `OracleRequest` events observed.
    pub requests_seen: u64,
    /// Requests under one of the agent's indexes.
    pub requests_matched: u64,
    /// Attestations the ledger accepted.
    pub responses_submitted: u64,
    /// Attestations the ledger refused.
    pub responses_rejected: u64,
    /// Matched requests skipped because the flight was already resolved.
    pub skipped_resolved: u64,
    /// Calls abandoned after exhausting transport retries.
    pub transport_failures: u64,
    /// Times the event stream was re-established.
    pub resubscriptions: u64,
}

/// An oracle agent, ready to start.
pub struct OracleAgent {
    identity: Identity,
    gateway: Arc<dyn LedgerGateway>,
    status_source: Arc<dyn StatusSource>,
    config: AgentConfig,
}

impl OracleAgent {
    /// Create an agent for `identity`.
    pub fn new(
        identity: Identity,
        gateway: Arc<dyn LedgerGateway>,
        status_source: Arc<dyn StatusSource>,
        config: AgentConfig,
    ) -> Self {
        Self {
            identity,
            gateway,
            status_source,
            config,
        }
    }

    /// Register if needed, fetch indexes, subscribe, and spawn the event loop.
    ///
    /// # Errors
    ///
    /// `AgentError::Startup` if any startup call fails permanently.
    pub async fn start(self) -> Result<AgentHandle, AgentError> {
        let session = Uuid::new_v4();
        let span = info_span!("oracle_agent", oracle = %self.identity.short(), %session);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let mut worker = Worker {
            identity: self.identity,
            gateway: self.gateway,
            status_source: self.status_source,
            config: self.config,
            indexes: [0; ORACLE_INDEX_COUNT],
            last_sequence: None,
            stats: AgentStats::default(),
            shutdown: shutdown_rx,
        };

        let subscription = worker.startup().instrument(span.clone()).await?;
        let indexes = worker.indexes;
        let task = tokio::spawn(worker.run(subscription).instrument(span));

        Ok(AgentHandle {
            identity: self.identity,
            indexes,
            session,
            shutdown: shutdown_tx,
            task,
        })
    }
}

/// Control handle of a running agent.
pub struct AgentHandle {
    identity: Identity,
    indexes: [u8; ORACLE_INDEX_COUNT],
    session: Uuid,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<Result<AgentStats, AgentError>>,
}

impl AgentHandle {
    /// The oracle identity.
    #[must_use]
    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// Indexes the agent answers for.
    #[must_use]
    pub fn indexes(&self) -> [u8; ORACLE_INDEX_COUNT] {
        self.indexes
    }

    /// Session id used in this agent's log span.
    #[must_use]
    pub fn session(&self) -> Uuid {
        self.session
    }

    /// Whether the event loop has exited on its own.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal shutdown and wait for the current event to finish.
    ///
    /// # Errors
    ///
    /// The loop's own error, or `AgentError::Task` if it panicked.
    pub async fn stop(self) -> Result<AgentStats, AgentError> {
        let _ = self.shutdown.send(true);
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(AgentError::Task(e.to_string())),
        }
    }
}

/// State owned by the spawned event loop.
struct Worker {
    identity: Identity,
    gateway: Arc<dyn LedgerGateway>,
    status_source: Arc<dyn StatusSource>,
    config: AgentConfig,
    indexes: [u8; ORACLE_INDEX_COUNT],
    last_sequence: Option<u64>,
    stats: AgentStats,
    shutdown: watch::Receiver<bool>,
}

impl Worker {
    async fn startup(&mut self) -> Result<Subscription, AgentError> {
        let identity = self.identity;
        let gateway = self.gateway.clone();

        let registered = with_retry(&self.config, &mut self.shutdown, "is_oracle_registered", || {
            let gateway = gateway.clone();
            async move { gateway.is_oracle_registered(identity).await }
        })
        .await
        .map_err(|source| AgentError::Startup {
            operation: "is_oracle_registered",
            source,
        })?;

        if !registered {
            let fee = self.config.registration_fee;
            with_retry(&self.config, &mut self.shutdown, "register_oracle", || {
                let gateway = gateway.clone();
                async move { gateway.register_oracle(identity, fee).await }
            })
            .await
            .map_err(|source| AgentError::Startup {
                operation: "register_oracle",
                source,
            })?;
            info!(fee, "Oracle registered");
        }

        self.indexes = with_retry(&self.config, &mut self.shutdown, "get_my_indexes", || {
            let gateway = gateway.clone();
            async move { gateway.get_my_indexes(identity).await }
        })
        .await
        .map_err(|source| AgentError::Startup {
            operation: "get_my_indexes",
            source,
        })?;

        let subscription = self.subscribe().await.map_err(|source| AgentError::Startup {
            operation: "subscribe_requests",
            source,
        })?;

        info!(indexes = ?self.indexes, "Oracle agent started");
        Ok(subscription)
    }

    async fn subscribe(&mut self) -> Result<Subscription, GatewayError> {
        let gateway = self.gateway.clone();
        with_retry(&self.config, &mut self.shutdown, "subscribe_requests", || {
            let gateway = gateway.clone();
            async move { gateway.subscribe_requests().await }
        })
        .await
    }

    async fn run(mut self, mut subscription: Subscription) -> Result<AgentStats, AgentError> {
        loop {
            let next = tokio::select! {
                biased;
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                    continue;
                }
                next = subscription.recv() => next,
            };

            match next {
                Ok(logged) => self.handle(logged).await,
                Err(e) => {
                    match e {
                        SubscriptionError::Lagged { missed } => {
                            warn!(missed, "Event stream lagged, resubscribing from earliest");
                        }
                        SubscriptionError::Closed => {
                            warn!("Event stream closed, resubscribing from earliest");
                        }
                    }
                    match self.resubscribe().await? {
                        Some(next) => subscription = next,
                        None => break,
                    }
                }
            }
        }

        drop(subscription);
        info!(stats = ?self.stats, "Oracle agent stopped");
        Ok(self.stats)
    }

    /// `Ok(None)` means shutdown was requested while reconnecting.
    async fn resubscribe(&mut self) -> Result<Option<Subscription>, AgentError> {
        let attempts = self.config.max_resubscribe_attempts.max(1);
        for attempt in 1..=attempts {
            match self.subscribe().await {
                Ok(subscription) => {
                    self.stats.resubscriptions += 1;
                    debug!(attempt, last_sequence = ?self.last_sequence, "Resubscribed");
                    return Ok(Some(subscription));
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Resubscription failed");
                    if *self.shutdown.borrow() {
                        return Ok(None);
                    }
                    tokio::select! {
                        _ = tokio::time::sleep(self.config.backoff_delay(attempt)) => {}
                        _ = self.shutdown.changed() => return Ok(None),
                    }
                }
            }
        }
        error!(attempts, "Giving up on event stream");
        Err(AgentError::StreamLost { attempts })
    }

    async fn handle(&mut self, logged: LoggedEvent) {
        if self.last_sequence.is_some_and(|last| logged.sequence <= last) {
            debug!(sequence = logged.sequence, "Skipping already processed event");
            return;
        }
        self.last_sequence = Some(logged.sequence);

        let SuretyEvent::OracleRequest {
            index,
            airline,
            designator,
            timestamp,
        } = logged.event
        else {
            return;
        };
        self.stats.requests_seen += 1;

        if !self.indexes.contains(&index) {
            return;
        }
        self.stats.requests_matched += 1;

        let flight = FlightKey::new(airline, designator, timestamp);
        let gateway = self.gateway.clone();

        let current = {
            let flight = flight.clone();
            with_retry(&self.config, &mut self.shutdown, "get_flight_status_code", || {
                let gateway = gateway.clone();
                let flight = flight.clone();
                async move { gateway.get_flight_status_code(&flight).await }
            })
            .await
        };
        match current {
            Ok(status) if status.is_resolved() => {
                self.stats.skipped_resolved += 1;
                debug!(flight = %flight, status = %status, "Flight already resolved");
                return;
            }
            Ok(_) => {}
            Err(e) => {
                self.record_failure("get_flight_status_code", &flight, &e);
                return;
            }
        }

        let status = self.status_source.attest(&flight, index);
        let identity = self.identity;
        let submitted = {
            let flight = flight.clone();
            with_retry(&self.config, &mut self.shutdown, "submit_oracle_response", || {
                let gateway = gateway.clone();
                let flight = flight.clone();
                async move {
                    gateway
                        .submit_oracle_response(identity, index, &flight, status)
                        .await
                }
            })
            .await
        };

        match submitted {
            Ok(()) => {
                self.stats.responses_submitted += 1;
                info!(
                    sequence = logged.sequence,
                    index,
                    flight = %flight,
                    status = %status,
                    "Attestation submitted"
                );
            }
            Err(e) => self.record_failure("submit_oracle_response", &flight, &e),
        }
    }

    fn record_failure(&mut self, operation: &'static str, flight: &FlightKey, e: &GatewayError) {
        match e {
            GatewayError::Rejected(kind, message) => {
                self.stats.responses_rejected += 1;
                warn!(operation, flight = %flight, kind = %kind, message, "Ledger rejected call");
            }
            GatewayError::Transport(message) => {
                self.stats.transport_failures += 1;
                error!(operation, flight = %flight, message, "Giving up after transport failures");
            }
        }
    }
}
