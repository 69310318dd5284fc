//! # Pulse-Chain Node
//!
//! Entry point: `ADDR=8080 node-runtime`. See [`node_runtime::container::config`]
//! for every recognised variable.

use anyhow::Result;
use node_runtime::{load_env_file, telemetry, NodeConfig, NodeRuntime};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let env_file = load_env_file();
    let config = NodeConfig::from_env()?;
    telemetry::init_tracing(&config)?;

    match env_file {
        Ok(Some(path)) => info!("Loaded environment from {}", path.display()),
        Ok(None) => {}
        Err(e) => warn!("Ignoring unreadable .env file: {}", e),
    }

    let runtime = NodeRuntime::new(config)?;
    runtime.start().await?;

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown().await;

    Ok(())
}
