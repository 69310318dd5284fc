//! # Pulse-Chain Node Runtime
//!
//! Wires one ledger to one gateway and runs until told to stop.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment (`ADDR` is required)
//! 2. Create the event bus and the ledger with its genesis record
//! 3. Dump the genesis chain and announce it on the bus
//! 4. Bind the selected gateway (HTTP or TCP) and serve in the background
//!
//! ## Shutdown Sequence
//!
//! 1. Cancel in-flight mining
//! 2. Flip the shutdown channel; gateways stop accepting and close sessions
//! 3. Wait for the server task, bounded by [`SHUTDOWN_GRACE`]

#![warn(missing_docs)]

pub mod container;
pub mod telemetry;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use pc_02_api_gateway::{ApiGatewayService, GatewayError};
use pc_03_line_gateway::{LineGatewayError, LineGatewayService};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub use container::{load_env_file, ConfigError, NodeConfig, SubsystemContainer, Transport};

/// How long shutdown waits for the gateway to wind down.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// The node runtime orchestrating the ledger and its gateway.
pub struct NodeRuntime {
    /// Shared instances.
    container: Arc<SubsystemContainer>,
    /// Running gateway, once started.
    server: Mutex<Option<JoinHandle<Result<()>>>>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: watch::Receiver<bool>,
}

impl NodeRuntime {
    /// Create the runtime and its subsystems.
    pub fn new(config: NodeConfig) -> Result<Self> {
        info!("Creating Pulse-Chain node runtime");

        let container = Arc::new(
            SubsystemContainer::new(config).context("Failed to initialize the ledger")?,
        );
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            container,
            server: Mutex::new(None),
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Announce genesis, bind the gateway and serve in the background.
    ///
    /// Returns the bound address, which differs from the configured one when
    /// the configured port is 0.
    pub async fn start(&self) -> Result<SocketAddr> {
        let config = &self.container.config;

        info!("===========================================");
        info!("  Pulse-Chain Node Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("  Transport: {}", config.transport);
        info!("  Consensus: {:?}", config.ledger.mode);
        info!("===========================================");

        self.container
            .ledger
            .announce_genesis()
            .await
            .context("Failed to announce genesis")?;

        let addr = config.listen_addr;
        let listener = TcpListener::bind(addr).await.map_err(|source| match config.transport {
            Transport::Http => anyhow::Error::from(GatewayError::Bind { addr, source }),
            Transport::Tcp => anyhow::Error::from(LineGatewayError::Bind { addr, source }),
        })?;
        let local = listener.local_addr()?;

        let shutdown = self.shutdown_rx.clone();
        let ledger = self.container.ledger_api();
        let handle = match config.transport {
            Transport::Http => {
                let service = ApiGatewayService::new(config.gateway.clone(), ledger)?;
                tokio::spawn(async move {
                    service
                        .serve(listener, shutdown)
                        .await
                        .map_err(anyhow::Error::from)
                })
            }
            Transport::Tcp => {
                let service = LineGatewayService::new(
                    config.line_gateway.clone(),
                    ledger,
                    Arc::clone(&self.container.event_bus),
                )?;
                tokio::spawn(async move {
                    service
                        .serve(listener, shutdown)
                        .await
                        .map_err(anyhow::Error::from)
                })
            }
        };
        *self.server.lock() = Some(handle);

        info!("Node running on {} ({})", local, config.transport);
        Ok(local)
    }

    /// Shutdown the node gracefully.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        self.container.ledger.shutdown();
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let handle = self.server.lock().take();
        if let Some(handle) = handle {
            match tokio::time::timeout(SHUTDOWN_GRACE, handle).await {
                Ok(Ok(Ok(()))) => {}
                Ok(Ok(Err(e))) => error!("Gateway exited with error: {:#}", e),
                Ok(Err(e)) => error!("Gateway task failed: {}", e),
                Err(_) => warn!("Gateway did not stop within {:?}", SHUTDOWN_GRACE),
            }
        }

        info!("Shutdown complete");
    }

    /// Get a reference to the subsystem container.
    pub fn container(&self) -> Arc<SubsystemContainer> {
        Arc::clone(&self.container)
    }
}
