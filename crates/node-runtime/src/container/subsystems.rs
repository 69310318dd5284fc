//! Shared instances built once per process.

use crate::container::config::NodeConfig;
use pc_01_ledger::{LedgerApi, LedgerError, LedgerService};
use shared_bus::InMemoryEventBus;
use std::sync::Arc;
use tracing::info;

/// The event bus and the ledger publishing on it.
pub struct SubsystemContainer {
    /// Node configuration.
    pub config: NodeConfig,
    /// Chain change notifications.
    pub event_bus: Arc<InMemoryEventBus>,
    /// The one ledger every gateway session shares.
    pub ledger: Arc<LedgerService>,
}

impl SubsystemContainer {
    /// Build the bus, then the ledger and its genesis record.
    pub fn new(config: NodeConfig) -> Result<Self, LedgerError> {
        info!("Initializing subsystems");

        let event_bus = Arc::new(InMemoryEventBus::new());
        info!("  Event bus ready (capacity {})", event_bus.capacity());

        let ledger = Arc::new(LedgerService::new(
            Arc::clone(&event_bus),
            config.ledger.clone(),
        )?);
        info!("  [1] Ledger initialized ({} record)", ledger.len());

        Ok(Self {
            config,
            event_bus,
            ledger,
        })
    }

    /// The ledger behind its inbound port.
    pub fn ledger_api(&self) -> Arc<dyn LedgerApi> {
        Arc::clone(&self.ledger) as Arc<dyn LedgerApi>
    }
}
