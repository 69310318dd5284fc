//! Genesis Block Creation
//!
//! The genesis record bootstraps the ledger: index 0, BPM 0, the sentinel as
//! its predecessor and a hash computed over its own fields.

use crate::utils::hashing::calculate_hash;
use shared_types::{Block, GENESIS_PREV_HASH};

/// Creates the genesis record.
///
/// `difficulty` is `Some` on a proof-of-work ledger so the record carries the
/// same fields as its successors. Genesis is never mined.
pub fn create_genesis_block(timestamp: impl Into<String>, difficulty: Option<u32>) -> Block {
    let mut genesis = Block {
        index: 0,
        timestamp: timestamp.into(),
        bpm: 0,
        hash: String::new(),
        prev_hash: GENESIS_PREV_HASH.to_string(),
        difficulty,
        nonce: difficulty.map(|_| String::new()),
    };
    genesis.hash = calculate_hash(&genesis);
    genesis
}
