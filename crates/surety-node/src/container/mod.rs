//! # Container
//!
//! Node configuration.

pub mod config;

pub use config::{
    load_config, AgentsConfig, BusConfig, ConfigError, GenesisConfig, NodeConfig, ProtocolConfig,
};
