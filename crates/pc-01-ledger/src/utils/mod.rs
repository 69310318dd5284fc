//! Utility modules for the ledger

pub mod hashing;

pub use hashing::{calculate_hash, canonical_record, meets_difficulty, sha256_hex};
