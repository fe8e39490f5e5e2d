//! # Node Configuration
//!
//! Unified configuration for the ledger, the event log and the oracle fleet.
//!
//! Every value has a default matching the deployed protocol. Environment
//! variables prefixed `SURETY_` override them at startup; unparsable values
//! are logged and ignored.

use fs_02_airline_registry::AdmissionConfig;
use fs_04_oracle_consensus::ConsensusConfig;
use fs_05_insurance_ledger::InsuranceConfig;
use fs_06_oracle_agent::AgentConfig;
use serde::{Deserialize, Serialize};
use shared_bus::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_RETENTION};
use shared_types::{
    ether, Amount, Identity, ADMISSION_THRESHOLD, FUNDING_MINIMUM, INDEX_RANGE, MIN_RESPONSES,
    PAYOUT_MULTIPLIER_DENOMINATOR, PAYOUT_MULTIPLIER_NUMERATOR, PREMIUM_CAP, REGISTRATION_FEE,
};
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Complete node configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Protocol parameters.
    pub protocol: ProtocolConfig,
    /// Oracle fleet.
    pub agents: AgentsConfig,
    /// Event log sizing.
    pub bus: BusConfig,
    /// Initial accounts and balances.
    pub genesis: GenesisConfig,
    /// `tracing` filter directive.
    pub log_filter: LogFilter,
}

/// Log filter directive, `info` by default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogFilter(pub String);

impl Default for LogFilter {
    fn default() -> Self {
        Self("info".to_string())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A parameter that must be positive was zero.
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    /// Retained events would not cover one channel's worth of backlog.
    #[error("event retention {retention} is smaller than channel capacity {capacity}")]
    RetentionTooSmall {
        /// Configured retention.
        retention: usize,
        /// Configured channel capacity.
        capacity: usize,
    },

    /// Payout multiplier below one would pay less than the premium.
    #[error("payout multiplier {numerator}/{denominator} is below 1")]
    PayoutBelowPremium {
        /// Numerator.
        numerator: Amount,
        /// Denominator.
        denominator: Amount,
    },
}

impl NodeConfig {
    /// Check internal consistency.
    ///
    /// # Errors
    ///
    /// The first inconsistency found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.protocol;
        if p.admission_threshold == 0 {
            return Err(ConfigError::Zero("admission_threshold"));
        }
        if p.min_responses == 0 {
            return Err(ConfigError::Zero("min_responses"));
        }
        if p.index_range == 0 {
            return Err(ConfigError::Zero("index_range"));
        }
        if p.premium_cap == 0 {
            return Err(ConfigError::Zero("premium_cap"));
        }
        if p.payout_denominator == 0 {
            return Err(ConfigError::Zero("payout_denominator"));
        }
        if p.payout_numerator < p.payout_denominator {
            return Err(ConfigError::PayoutBelowPremium {
                numerator: p.payout_numerator,
                denominator: p.payout_denominator,
            });
        }
        if self.bus.channel_capacity == 0 {
            return Err(ConfigError::Zero("channel_capacity"));
        }
        if self.bus.retention < self.bus.channel_capacity {
            return Err(ConfigError::RetentionTooSmall {
                retention: self.bus.retention,
                capacity: self.bus.channel_capacity,
            });
        }
        if self.agents.agent.max_attempts == 0 {
            return Err(ConfigError::Zero("max_attempts"));
        }
        Ok(())
    }

    /// Apply `SURETY_*` overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        override_parsed(&lookup, "SURETY_ORACLE_COUNT", &mut self.agents.oracle_count);
        override_parsed(&lookup, "SURETY_EVENT_RETENTION", &mut self.bus.retention);
        override_parsed(&lookup, "SURETY_CHANNEL_CAPACITY", &mut self.bus.channel_capacity);
        override_parsed(
            &lookup,
            "SURETY_MAX_SUBMIT_RETRIES",
            &mut self.agents.agent.max_attempts,
        );
        override_parsed(&lookup, "SURETY_BASE_BACKOFF_MS", &mut self.agents.agent.base_backoff_ms);
        override_parsed(&lookup, "SURETY_MIN_RESPONSES", &mut self.protocol.min_responses);
        override_parsed(&lookup, "SURETY_INDEX_RANGE", &mut self.protocol.index_range);

        if let Some(seed) = lookup("SURETY_ENTROPY_SEED") {
            match seed.parse() {
                Ok(seed) => self.genesis.entropy_seed = Some(seed),
                Err(_) => warn!(value = %seed, "SURETY_ENTROPY_SEED is not a u64, ignoring"),
            }
        }
        if let Some(owner) = lookup("SURETY_OWNER") {
            override_identity(&owner, "SURETY_OWNER", &mut self.genesis.owner);
        }
        if let Some(filter) = lookup("SURETY_LOG") {
            self.log_filter = LogFilter(filter);
        }
    }
}

fn override_parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    target: &mut T,
) {
    let Some(raw) = lookup(var) else {
        return;
    };
    match raw.parse() {
        Ok(value) => *target = value,
        Err(_) => warn!(var, value = %raw, "Unparsable override, keeping default"),
    }
}

fn override_identity(raw: &str, var: &'static str, target: &mut Identity) {
    match raw.parse() {
        Ok(identity) => *target = identity,
        Err(e) => warn!(var, error = %e, "Invalid identity override, keeping default"),
    }
}

/// Load configuration from defaults plus process environment.
#[must_use]
pub fn load_config() -> NodeConfig {
    let mut config = NodeConfig::default();
    config.apply_overrides(|var| std::env::var(var).ok());
    config
}

/// Protocol parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Members admitted without voting while below this count.
    pub admission_threshold: usize,
    /// Minimum airline funding deposit.
    pub funding_minimum: Amount,
    /// Oracle registration fee.
    pub registration_fee: Amount,
    /// Matching attestations required to finalize.
    pub min_responses: usize,
    /// Indexes drawn from `[0, index_range)`.
    pub index_range: u8,
    /// Largest premium per policy.
    pub premium_cap: Amount,
    /// Payout multiplier numerator.
    pub payout_numerator: Amount,
    /// Payout multiplier denominator.
    pub payout_denominator: Amount,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            admission_threshold: ADMISSION_THRESHOLD,
            funding_minimum: FUNDING_MINIMUM,
            registration_fee: REGISTRATION_FEE,
            min_responses: MIN_RESPONSES,
            index_range: INDEX_RANGE,
            premium_cap: PREMIUM_CAP,
            payout_numerator: PAYOUT_MULTIPLIER_NUMERATOR,
            payout_denominator: PAYOUT_MULTIPLIER_DENOMINATOR,
        }
    }
}

impl ProtocolConfig {
    /// Airline registry parameters.
    #[must_use]
    pub fn admission(&self) -> AdmissionConfig {
        AdmissionConfig {
            admission_threshold: self.admission_threshold,
            funding_minimum: self.funding_minimum,
        }
    }

    /// Consensus engine parameters.
    #[must_use]
    pub fn consensus(&self) -> ConsensusConfig {
        ConsensusConfig {
            registration_fee: self.registration_fee,
            min_responses: self.min_responses,
            index_range: self.index_range,
        }
    }

    /// Insurance ledger parameters.
    #[must_use]
    pub fn insurance(&self) -> InsuranceConfig {
        InsuranceConfig {
            premium_cap: self.premium_cap,
            payout_numerator: self.payout_numerator,
            payout_denominator: self.payout_denominator,
        }
    }
}

/// Oracle fleet configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    /// Number of oracle agents to run.
    pub oracle_count: usize,
    /// Oracle `n` uses identity `first_oracle + n`.
    pub first_oracle: u64,
    /// Genesis balance of each oracle account.
    pub oracle_balance: Amount,
    /// Per-agent tuning.
    pub agent: AgentConfig,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            oracle_count: 20,
            first_oracle: 1_000,
            oracle_balance: ether(100),
            agent: AgentConfig::default(),
        }
    }
}

impl AgentsConfig {
    /// Identities of the configured oracles.
    #[must_use]
    pub fn oracle_identities(&self) -> Vec<Identity> {
        (0..self.oracle_count as u64)
            .map(|n| Identity::from_low_u64(self.first_oracle + n))
            .collect()
    }
}

/// Event log sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    /// Live events buffered per subscriber before it lags.
    pub channel_capacity: usize,
    /// Events retained for replay.
    pub retention: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            retention: DEFAULT_RETENTION,
        }
    }
}

/// Initial accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// Owner of the account authority.
    pub owner: Identity,
    /// Application identity authorized to mutate the registries.
    pub app: Identity,
    /// Airline admitted at genesis.
    pub first_airline: Identity,
    /// Genesis balance of the first airline.
    pub airline_balance: Amount,
    /// Seed for reproducible index draws; OS entropy when unset.
    pub entropy_seed: Option<u64>,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            owner: Identity::from_low_u64(1),
            app: Identity::from_low_u64(2),
            first_airline: Identity::from_low_u64(10),
            airline_balance: ether(100),
            entropy_seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = NodeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.protocol.admission_threshold, 4);
        assert_eq!(config.agents.oracle_count, 20);
        assert_eq!(config.log_filter, LogFilter("info".into()));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = NodeConfig::default();
        config.apply_overrides(lookup_from(&[
            ("SURETY_ORACLE_COUNT", "5"),
            ("SURETY_EVENT_RETENTION", "2000"),
            ("SURETY_MAX_SUBMIT_RETRIES", "2"),
            ("SURETY_ENTROPY_SEED", "42"),
            ("SURETY_LOG", "debug"),
        ]));
        assert_eq!(config.agents.oracle_count, 5);
        assert_eq!(config.bus.retention, 2000);
        assert_eq!(config.agents.agent.max_attempts, 2);
        assert_eq!(config.genesis.entropy_seed, Some(42));
        assert_eq!(config.log_filter.0, "debug");
    }

    #[test]
    fn test_bad_override_keeps_default() {
        let mut config = NodeConfig::default();
        config.apply_overrides(lookup_from(&[
            ("SURETY_ORACLE_COUNT", "many"),
            ("SURETY_OWNER", "0x12"),
        ]));
        assert_eq!(config.agents.oracle_count, 20);
        assert_eq!(config.genesis.owner, Identity::from_low_u64(1));
    }

    #[test]
    fn test_identity_override() {
        let mut config = NodeConfig::default();
        let owner = Identity::from_low_u64(0xBEEF);
        config.apply_overrides(lookup_from(&[("SURETY_OWNER", &owner.to_string())]));
        assert_eq!(config.genesis.owner, owner);
    }

    #[test]
    fn test_validate_rejects_zero_parameters() {
        let mut config = NodeConfig::default();
        config.protocol.min_responses = 0;
        assert_eq!(config.validate(), Err(ConfigError::Zero("min_responses")));

        let mut config = NodeConfig::default();
        config.bus.retention = 10;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RetentionTooSmall { .. })
        ));

        let mut config = NodeConfig::default();
        config.protocol.payout_numerator = 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PayoutBelowPremium { .. })
        ));
    }

    #[test]
    fn test_component_configs_follow_protocol() {
        let mut protocol = ProtocolConfig::default();
        protocol.min_responses = 5;
        protocol.admission_threshold = 2;
        assert_eq!(protocol.consensus().min_responses, 5);
        assert_eq!(protocol.admission().admission_threshold, 2);
        assert_eq!(protocol.insurance().premium_cap, PREMIUM_CAP);
    }

    #[test]
    fn test_oracle_identities() {
        let agents = AgentsConfig {
            oracle_count: 3,
            ..Default::default()
        };
        let ids = agents.oracle_identities();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[2], Identity::from_low_u64(1_002));
    }
}
