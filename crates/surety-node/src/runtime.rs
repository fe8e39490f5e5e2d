//! # Node Runtime
//!
//! Builds the ledger from [`NodeConfig`], seeds genesis accounts and runs the
//! configured oracle fleet against it.
//!
//! ## Startup Sequence
//!
//! 1. Validate configuration
//! 2. Create the event log and the ledger
//! 3. Genesis: authorize the app, admit and fund the first airline, seed
//!    oracle balances
//! 4. Start one agent per configured oracle

use crate::adapters::LocalLedgerGateway;
use crate::container::{ConfigError, NodeConfig};
use crate::ledger::{LedgerError, SuretyLedger};
use fs_04_oracle_consensus::{EntropySource, KeccakEntropy};
use fs_06_oracle_agent::{AgentError, AgentHandle, AgentStats, OracleAgent, RandomStatusSource};
use shared_bus::InMemoryEventBus;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Node lifecycle failures.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Configuration rejected.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A genesis call failed.
    #[error("Genesis failed: {0}")]
    Genesis(#[from] LedgerError),

    /// No oracle agent could be started.
    #[error("No oracle agent started: {0}")]
    Agents(#[source] AgentError),
}

/// A running surety node.
pub struct SuretyNode {
    config: NodeConfig,
    ledger: Arc<SuretyLedger>,
    agents: Vec<AgentHandle>,
}

impl SuretyNode {
    /// Create a node with an empty ledger.
    ///
    /// # Errors
    ///
    /// `NodeError::Config` if the configuration is inconsistent.
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        config.validate()?;
        info!("Creating flight surety node");

        let entropy: Box<dyn EntropySource> = match config.genesis.entropy_seed {
            Some(seed) => {
                warn!(seed, "Using seeded entropy, index draws are reproducible");
                Box::new(KeccakEntropy::seeded(seed))
            }
            None => Box::new(KeccakEntropy::from_os()),
        };
        let bus = InMemoryEventBus::with_limits(config.bus.channel_capacity, config.bus.retention);
        let ledger = SuretyLedger::new(
            config.genesis.owner,
            config.genesis.app,
            &config.protocol,
            bus,
            entropy,
        );

        Ok(Self {
            config,
            ledger: Arc::new(ledger),
            agents: Vec::new(),
        })
    }

    /// Run genesis and start the oracle fleet.
    ///
    /// # Errors
    ///
    /// `NodeError::Genesis` if a genesis call fails, `NodeError::Agents` if
    /// oracles were configured and none of them started.
    pub async fn start(&mut self) -> Result<(), NodeError> {
        info!("===========================================");
        info!("  Flight Surety Node v{}", crate::VERSION);
        info!("===========================================");

        self.initialize_genesis().await?;
        self.start_agents().await?;

        info!(
            oracles = self.agents.len(),
            owner = %self.config.genesis.owner,
            first_airline = %self.config.genesis.first_airline,
            "Node running"
        );
        Ok(())
    }

    async fn initialize_genesis(&self) -> Result<(), NodeError> {
        let genesis = &self.config.genesis;
        if self.ledger.is_airline_registered(genesis.first_airline).await {
            info!("Genesis already applied");
            return Ok(());
        }

        self.ledger
            .authorize_app(genesis.owner, genesis.app)
            .await?;
        self.ledger
            .bootstrap_airline(genesis.owner, genesis.first_airline)
            .await?;
        self.ledger
            .deposit(genesis.first_airline, genesis.airline_balance)
            .await;
        self.ledger
            .fund_airline(genesis.first_airline, self.config.protocol.funding_minimum)
            .await?;

        for oracle in self.config.agents.oracle_identities() {
            self.ledger
                .deposit(oracle, self.config.agents.oracle_balance)
                .await;
        }

        info!(
            app = %genesis.app,
            first_airline = %genesis.first_airline,
            pool = self.ledger.pool_balance().await,
            "Genesis applied"
        );
        Ok(())
    }

    async fn start_agents(&mut self) -> Result<(), NodeError> {
        let gateway = Arc::new(LocalLedgerGateway::new(Arc::clone(&self.ledger)));
        let status_source = Arc::new(RandomStatusSource);
        let mut agent_config = self.config.agents.agent.clone();
        agent_config.registration_fee = self.config.protocol.registration_fee;

        let mut last_error = None;
        for oracle in self.config.agents.oracle_identities() {
            let agent = OracleAgent::new(
                oracle,
                gateway.clone(),
                status_source.clone(),
                agent_config.clone(),
            );
            match agent.start().await {
                Ok(handle) => self.agents.push(handle),
                Err(e) => {
                    error!(oracle = %oracle, error = %e, "Oracle agent failed to start");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if self.agents.is_empty() => Err(NodeError::Agents(e)),
            _ => Ok(()),
        }
    }

    /// The ledger this node serves.
    #[must_use]
    pub fn ledger(&self) -> Arc<SuretyLedger> {
        Arc::clone(&self.ledger)
    }

    /// Running agents.
    #[must_use]
    pub fn agents(&self) -> &[AgentHandle] {
        &self.agents
    }

    /// Stop every agent, letting each finish its current event.
    pub async fn shutdown(self) -> Vec<AgentStats> {
        info!("Initiating graceful shutdown...");

        let mut stats = Vec::with_capacity(self.agents.len());
        for handle in self.agents {
            let oracle = handle.identity();
            match handle.stop().await {
                Ok(s) => stats.push(s),
                Err(e) => error!(oracle = %oracle, error = %e, "Agent ended with error"),
            }
        }

        let submitted: u64 = stats.iter().map(|s| s.responses_submitted).sum();
        info!(
            agents = stats.len(),
            submitted,
            events = self.ledger.events_published(),
            "Shutdown complete"
        );
        stats
    }
}
