//! Line Gateway service: accept loop and session bookkeeping.

use crate::config::LineGatewayConfig;
use crate::error::LineGatewayError;
use crate::session::{stopped, Session};
use pc_01_ledger::LedgerApi;
use shared_bus::{EventFilter, InMemoryEventBus};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// TCP gateway over a shared ledger
pub struct LineGatewayService {
    config: LineGatewayConfig,
    ledger: Arc<dyn LedgerApi>,
    event_bus: Arc<InMemoryEventBus>,
    active: Arc<AtomicUsize>,
}

impl LineGatewayService {
    /// Create a new line gateway
    pub fn new(
        config: LineGatewayConfig,
        ledger: Arc<dyn LedgerApi>,
        event_bus: Arc<InMemoryEventBus>,
    ) -> Result<Self, LineGatewayError> {
        config.validate()?;
        Ok(Self {
            config,
            ledger,
            event_bus,
            active: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Sessions currently connected
    pub fn active_sessions(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Bind the configured address and serve until `shutdown` flips.
    pub async fn start(&self, shutdown: watch::Receiver<bool>) -> Result<(), LineGatewayError> {
        let addr = self.config.listen_addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| LineGatewayError::Bind { addr, source })?;
        self.serve(listener, shutdown).await
    }

    /// Accept peers on an already-bound listener until `shutdown` flips.
    pub async fn serve(
        &self,
        listener: TcpListener,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), LineGatewayError> {
        info!("[pc-03] TCP Server Listening on {}", listener.local_addr()?);
        let mut sessions = JoinSet::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let session = Session::new(
                            peer,
                            Arc::clone(&self.ledger),
                            self.config.push_interval,
                            self.config.drain_timeout,
                        );
                        let subscription = self.event_bus.subscribe(EventFilter::chain_changes());
                        sessions.spawn(session.run(
                            stream,
                            subscription,
                            Arc::clone(&self.active),
                            shutdown.clone(),
                        ));
                    }
                    Err(e) => warn!(error = %e, "[pc-03] Accept failed"),
                },
                Some(_) = sessions.join_next(), if !sessions.is_empty() => {}
                _ = stopped(&mut shutdown) => {
                    info!("[pc-03] Received shutdown signal");
                    break;
                }
            }
        }

        info!("[pc-03] Waiting for {} sessions to close", sessions.len());
        while sessions.join_next().await.is_some() {}
        Ok(())
    }
}
