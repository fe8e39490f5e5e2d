//! # Flight Surety Node
//!
//! Runs a ledger with its oracle fleet until Ctrl+C.
//!
//! Configuration comes from `SURETY_*` environment variables; see
//! [`surety_node::container::config`].

use anyhow::{Context, Result};
use surety_node::{load_config, SuretyNode};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config();

    // Initialize logging
    let filter = EnvFilter::try_new(&config.log_filter.0)
        .with_context(|| format!("Invalid log filter {:?}", config.log_filter.0))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let mut node = SuretyNode::new(config).context("Failed to create node")?;
    node.start().await.context("Failed to start node")?;

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    // Graceful shutdown
    node.shutdown().await;

    Ok(())
}
