//! API Gateway service: binds the listener and serves until shutdown.

use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::router::build_router;
use axum::Router;
use pc_01_ledger::LedgerApi;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

/// HTTP gateway over a shared ledger
pub struct ApiGatewayService {
    config: GatewayConfig,
    ledger: Arc<dyn LedgerApi>,
}

impl ApiGatewayService {
    /// Create a new API Gateway service
    pub fn new(config: GatewayConfig, ledger: Arc<dyn LedgerApi>) -> Result<Self, GatewayError> {
        config.validate()?;
        Ok(Self { config, ledger })
    }

    /// Router with the full middleware stack
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.ledger), &self.config)
    }

    /// Bind the configured address and serve until `shutdown` flips.
    pub async fn start(&self, shutdown: watch::Receiver<bool>) -> Result<(), GatewayError> {
        let addr = self.config.listen_addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| GatewayError::Bind { addr, source })?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already-bound listener until `shutdown` flips.
    pub async fn serve(
        &self,
        listener: TcpListener,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), GatewayError> {
        let local = listener.local_addr().map_err(GatewayError::Serve)?;
        info!("[pc-02] HTTP Server Listening on {}", local);

        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                while !*shutdown.borrow() {
                    if shutdown.changed().await.is_err() {
                        break;
                    }
                }
                info!("[pc-02] Received shutdown signal");
            })
            .await;

        if let Err(e) = &result {
            error!(error = %e, "[pc-02] HTTP server error");
        }
        result.map_err(GatewayError::Serve)
    }
}
