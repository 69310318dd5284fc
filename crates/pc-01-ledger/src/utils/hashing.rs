//! Hashing utilities for the ledger
//!
//! A record's digest is SHA-256 over the concatenation
//!
//! ```text
//! decimal(Index) ++ Timestamp ++ decimal(BPM) ++ PrevHash ++ Nonce
//! ```
//!
//! rendered as 64 lowercase hex characters. Plain records have no nonce and
//! contribute the empty string in its place. `Difficulty` and `Hash` never
//! take part.

use sha2::{Digest, Sha256};
use shared_types::{Block, BlockHash};

/// Compute SHA-256 of data as lowercase hex
#[inline]
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// The exact byte string a record's hash covers.
pub fn canonical_record(block: &Block) -> String {
    let nonce = block.nonce.as_deref().unwrap_or("");
    let mut record = String::with_capacity(
        20 + block.timestamp.len() + 20 + block.prev_hash.len() + nonce.len(),
    );
    record.push_str(&block.index.to_string());
    record.push_str(&block.timestamp);
    record.push_str(&block.bpm.to_string());
    record.push_str(&block.prev_hash);
    record.push_str(nonce);
    record
}

/// Deterministic digest of a record. The stored `hash` field is ignored.
#[inline]
pub fn calculate_hash(block: &Block) -> BlockHash {
    sha256_hex(canonical_record(block).as_bytes())
}

/// Whether `hash` starts with at least `difficulty` `'0'` characters.
///
/// Difficulty 0 accepts every hash.
#[inline]
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let zeros = hash.bytes().take_while(|b| *b == b'0').count();
    zeros >= difficulty as usize
}
