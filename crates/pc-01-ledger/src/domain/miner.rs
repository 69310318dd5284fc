//! Record production
//!
//! A proof-of-work record is found by walking nonces `"0"`, `"1"`, ... `"a"`,
//! `"b"`, ... (lowercase hex of a counter) until the digest carries the
//! required leading zeros. Plain records are hashed once.

use crate::error::{LedgerError, Result};
use crate::utils::hashing::{calculate_hash, meets_difficulty};
use shared_types::{Block, Bpm};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How often the deadline is consulted when no throttle is configured.
const DEADLINE_CHECK_INTERVAL: u64 = 1024;

/// Abort flag for in-flight searches.
///
/// A flag made with [`Self::child`] also reads as cancelled once its parent
/// is, so one process-wide flag can stop every per-request search.
#[derive(Clone, Debug, Default)]
pub struct MiningCancel {
    flag: Arc<AtomicBool>,
    parent: Option<Arc<AtomicBool>>,
}

impl MiningCancel {
    /// Fresh, un-cancelled flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Independent flag that also observes this one.
    pub fn child(&self) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            parent: Some(Arc::clone(&self.flag)),
        }
    }

    /// Abort every search holding this flag.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether this flag or its parent was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
            || self
                .parent
                .as_ref()
                .is_some_and(|parent| parent.load(Ordering::Relaxed))
    }

    /// Guard that cancels this flag when dropped.
    pub fn cancel_on_drop(&self) -> CancelOnDrop {
        CancelOnDrop(self.clone())
    }
}

/// Cancels its flag on drop. Held by whoever awaits a search so that
/// abandoning the wait also stops the work.
#[derive(Debug)]
pub struct CancelOnDrop(MiningCancel);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Proof-of-work miner for a fixed difficulty.
#[derive(Clone, Debug)]
pub struct PoWMiner {
    difficulty: u32,
    /// Pause after every failed nonce
    throttle: Option<Duration>,
}

impl PoWMiner {
    /// Create a miner for `difficulty` leading zeros.
    pub fn new(difficulty: u32) -> Self {
        Self {
            difficulty,
            throttle: None,
        }
    }

    /// Sleep this long after each failed attempt.
    pub fn with_throttle(mut self, throttle: Option<Duration>) -> Self {
        self.throttle = throttle;
        self
    }

    /// Difficulty every mined record declares.
    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Unsealed record following `prev`: no hash, empty nonce.
    pub fn candidate(&self, prev: &Block, bpm: Bpm, timestamp: impl Into<String>) -> Block {
        Block {
            index: prev.index + 1,
            timestamp: timestamp.into(),
            bpm,
            hash: String::new(),
            prev_hash: prev.hash.clone(),
            difficulty: Some(self.difficulty),
            nonce: Some(String::new()),
        }
    }

    /// Mine until a nonce is found. Never gives up.
    pub fn mine(&self, prev: &Block, bpm: Bpm, timestamp: impl Into<String>) -> Result<Block> {
        self.mine_with(prev, bpm, timestamp, &MiningCancel::new(), None)
    }

    /// Mine until a nonce is found, `cancel` fires or `deadline` passes.
    #[tracing::instrument(skip(self, prev, timestamp, cancel), fields(index = prev.index + 1, difficulty = self.difficulty))]
    pub fn mine_with(
        &self,
        prev: &Block,
        bpm: Bpm,
        timestamp: impl Into<String>,
        cancel: &MiningCancel,
        deadline: Option<Instant>,
    ) -> Result<Block> {
        let mut block = self.candidate(prev, bpm, timestamp);
        let started = Instant::now();

        for attempts in 0u64..u64::MAX {
            if cancel.is_cancelled() {
                tracing::debug!(attempts, "Mining cancelled");
                return Err(LedgerError::MiningCancelled { attempts });
            }
            if let Some(deadline) = deadline {
                let due = self.throttle.is_some() || attempts % DEADLINE_CHECK_INTERVAL == 0;
                if due && Instant::now() >= deadline {
                    tracing::debug!(attempts, "Mining deadline exceeded");
                    return Err(LedgerError::MiningDeadlineExceeded { attempts });
                }
            }

            block.nonce = Some(format!("{attempts:x}"));
            let hash = calculate_hash(&block);
            if meets_difficulty(&hash, self.difficulty) {
                tracing::debug!(
                    attempts = attempts + 1,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    hash = %hash,
                    "Work done"
                );
                block.hash = hash;
                return Ok(block);
            }

            tracing::trace!(hash = %hash, "Do more work");
            if let Some(pause) = self.throttle {
                std::thread::sleep(pause);
            }
        }

        Err(LedgerError::MiningFailed)
    }
}

/// Plain record following `prev`, hashed once.
pub fn generate_block(prev: &Block, bpm: Bpm, timestamp: impl Into<String>) -> Block {
    let mut block = Block {
        index: prev.index + 1,
        timestamp: timestamp.into(),
        bpm,
        hash: String::new(),
        prev_hash: prev.hash.clone(),
        difficulty: None,
        nonce: None,
    };
    block.hash = calculate_hash(&block);
    block
}
