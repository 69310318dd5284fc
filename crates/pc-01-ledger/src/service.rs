//! Concrete Ledger Service Implementation
//!
//! Owns the one shared [`Chain`] and is the only code that mutates it.
//!
//! ```text
//!  Optimistic (default)                 Serialized
//!  ───────────────────                  ──────────
//!  read tail        (read lock)         take submission slot
//!  mine             (no lock)           read tail
//!  re-check tail ┐                      mine
//!  validate      ├ write lock           validate ┐ write lock
//!  append        ┘                      append   ┘
//!  publish event                        release slot, publish event
//! ```
//!
//! In optimistic mode a submitter whose tail moved while it was mining loses
//! with [`RejectionReason::StaleTail`]; nothing is retried.

use crate::config::{ConsensusMode, GuardMode, LedgerConfig};
use crate::domain::{create_genesis_block, generate_block, Chain, MiningCancel, PoWMiner};
use crate::error::{LedgerError, Result};
use crate::ports::{LedgerApi, SubmitOutcome};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_bus::{ChainEvent, EventPublisher, InMemoryEventBus};
use shared_types::{to_pretty_json, Block, Bpm, RejectionReason};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Wall-clock timestamp stamped on new records.
pub fn now_timestamp() -> String {
    chrono::Local::now().to_string()
}

/// Ledger service shared by every gateway session
pub struct LedgerService {
    /// The chain. Never held across an await.
    chain: RwLock<Chain>,

    /// Held across tail, mine and append in serialized mode
    submission_slot: tokio::sync::Mutex<()>,

    /// Event bus for chain change notifications
    event_bus: Arc<InMemoryEventBus>,

    /// Ledger configuration
    config: LedgerConfig,

    /// Miner for proof-of-work ledgers
    miner: PoWMiner,

    /// Aborts in-flight searches on shutdown
    cancel: MiningCancel,

    /// Searches still running on the blocking pool
    searches: Arc<AtomicUsize>,
}

/// Counts one running search for as long as it lives.
struct SearchSlot(Arc<AtomicUsize>);

impl SearchSlot {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for SearchSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl LedgerService {
    /// Create the service and install a fresh genesis record.
    pub fn new(event_bus: Arc<InMemoryEventBus>, config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        info!("[pc-01] Initializing Ledger Service");
        info!("  Consensus Mode: {:?}", config.mode);
        if config.mode == ConsensusMode::Pow {
            info!("  Difficulty: {}", config.difficulty);
        }
        info!("  Guard: {:?}", config.guard);
        info!("  Replace Policy: {:?}", config.replace_policy);

        let genesis = create_genesis_block(now_timestamp(), config.required_difficulty());
        let chain = Chain::with_genesis(
            genesis,
            config.required_difficulty(),
            config.replace_policy,
        )
        .map_err(|reason| LedgerError::InvalidGenesis(reason.to_string()))?;

        let miner = PoWMiner::new(config.difficulty).with_throttle(config.mining_throttle);

        Ok(Self {
            chain: RwLock::new(chain),
            submission_slot: tokio::sync::Mutex::new(()),
            event_bus,
            config,
            miner,
            cancel: MiningCancel::new(),
            searches: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Dump the genesis chain and announce it on the bus.
    pub async fn announce_genesis(&self) -> Result<usize> {
        let genesis = {
            let chain = self.chain.read();
            self.dump_chain(&chain);
            chain.blocks().first().cloned()
        };
        let genesis = genesis.ok_or(shared_types::EmptyChainError)?;
        Ok(self
            .event_bus
            .publish(ChainEvent::GenesisInitialized(genesis))
            .await)
    }

    /// Ledger configuration
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.chain.read().len()
    }

    /// Whether genesis is missing. Never true after [`Self::new`].
    pub fn is_empty(&self) -> bool {
        self.chain.read().is_empty()
    }

    /// The bus this service publishes to.
    pub fn event_bus(&self) -> &Arc<InMemoryEventBus> {
        &self.event_bus
    }

    /// Proof-of-work searches still occupying a blocking thread.
    pub fn searches_in_flight(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    /// Abort in-flight and future searches.
    pub fn shutdown(&self) {
        info!("[pc-01] Cancelling in-flight mining");
        self.cancel.cancel();
    }

    /// Print the whole chain to the server console.
    fn dump_chain(&self, chain: &Chain) {
        match to_pretty_json(chain.blocks()) {
            Ok(json) => info!("[pc-01] Chain ({} records):\n{}", chain.len(), json),
            Err(e) => warn!("[pc-01] Failed to encode chain for dump: {}", e),
        }
    }

    fn tail_snapshot(&self) -> Result<Block> {
        Ok(self.chain.read().tail()?.clone())
    }

    /// Build the next record on `prev`. Mining runs on the blocking pool.
    ///
    /// Each search gets its own cancel flag under the shutdown flag. If the
    /// caller stops awaiting (request timeout, dropped connection) the guard
    /// drops and the search aborts instead of burning a blocking thread.
    async fn produce(&self, prev: Block, bpm: Bpm) -> Result<Block> {
        let timestamp = now_timestamp();
        match self.config.mode {
            ConsensusMode::Plain => Ok(generate_block(&prev, bpm, timestamp)),
            ConsensusMode::Pow => {
                let miner = self.miner.clone();
                let search = self.cancel.child();
                let _abandon = search.cancel_on_drop();
                let slot = SearchSlot::enter(&self.searches);
                let deadline = self.config.mining_deadline.map(|d| Instant::now() + d);
                tokio::task::spawn_blocking(move || {
                    let _slot = slot;
                    miner.mine_with(&prev, bpm, timestamp, &search, deadline)
                })
                .await
                .map_err(|e| LedgerError::Internal(format!("mining task failed: {e}")))?
            }
        }
    }

    /// Re-check the tail and append under the write lock.
    fn commit(&self, built_on: &Block, candidate: Block) -> SubmitOutcome {
        let mut chain = self.chain.write();

        let moved = match chain.tail() {
            Ok(tail) if tail.hash != built_on.hash => Some(tail.index),
            Ok(_) => None,
            Err(_) => Some(0),
        };
        if let Some(tail) = moved {
            let reason = RejectionReason::StaleTail {
                built_on: built_on.index,
                tail,
            };
            warn!(index = candidate.index, %reason, "[pc-01] Dropping record mined on a stale tail");
            return SubmitOutcome::Rejected {
                block: candidate,
                reason,
            };
        }

        match chain.append(candidate.clone()) {
            Ok(()) => {
                self.dump_chain(&chain);
                SubmitOutcome::Accepted(candidate)
            }
            Err(reason) => SubmitOutcome::Rejected {
                block: candidate,
                reason,
            },
        }
    }

    async fn publish_outcome(&self, outcome: &SubmitOutcome) {
        let event = match outcome {
            SubmitOutcome::Accepted(block) => ChainEvent::BlockAppended(block.clone()),
            SubmitOutcome::Rejected { block, reason } => ChainEvent::BlockRejected {
                block: block.clone(),
                reason: reason.clone(),
            },
        };
        let delivered = self.event_bus.publish(event).await;
        debug!(delivered, "[pc-01] Submission outcome published");
    }
}

#[async_trait]
impl LedgerApi for LedgerService {
    #[tracing::instrument(skip(self))]
    async fn submit(&self, bpm: Bpm) -> Result<SubmitOutcome> {
        let outcome = match self.config.guard {
            GuardMode::Serialized => {
                let _slot = self.submission_slot.lock().await;
                let prev = self.tail_snapshot()?;
                let candidate = self.produce(prev.clone(), bpm).await?;
                self.commit(&prev, candidate)
            }
            GuardMode::Optimistic => {
                let prev = self.tail_snapshot()?;
                let candidate = self.produce(prev.clone(), bpm).await?;
                self.commit(&prev, candidate)
            }
        };

        if outcome.is_accepted() {
            info!(
                "[pc-01] Record #{} appended | BPM: {} | hash: {}",
                outcome.block().index,
                bpm,
                outcome.block().hash
            );
        }
        self.publish_outcome(&outcome).await;
        Ok(outcome)
    }

    async fn blocks(&self) -> Vec<Block> {
        self.chain.read().blocks().to_vec()
    }

    async fn tail(&self) -> Result<Block> {
        self.tail_snapshot()
    }

    #[tracing::instrument(skip(self, candidate), fields(length = candidate.len()))]
    async fn replace(&self, candidate: Vec<Block>) -> bool {
        let replaced = {
            let _slot = self.submission_slot.lock().await;
            let mut chain = self.chain.write();
            if chain.replace(candidate) {
                self.dump_chain(&chain);
                chain.tail().ok().map(|tail| (chain.len(), tail.hash.clone()))
            } else {
                None
            }
        };

        match replaced {
            Some((length, tail_hash)) => {
                info!("[pc-01] Chain replaced | length: {}", length);
                self.event_bus
                    .publish(ChainEvent::ChainReplaced { length, tail_hash })
                    .await;
                true
            }
            None => {
                debug!("[pc-01] Replacement refused");
                false
            }
        }
    }
}
