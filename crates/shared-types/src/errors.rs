//! # Error Types
//!
//! Errors and rejection reasons that cross crate boundaries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The chain has no records; genesis was never installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Chain is empty: genesis record not installed")]
pub struct EmptyChainError;

/// Why a candidate record was not appended.
///
/// Rejections are values, never faults: the ledger drops the candidate and
/// reports one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RejectionReason {
    /// Candidate index is not `prev.index + 1`.
    #[error("Index mismatch: expected {expected}, got {actual}")]
    IndexMismatch { expected: u64, actual: u64 },

    /// Candidate `prevHash` does not match the predecessor's hash.
    #[error("Previous hash mismatch at index {index}")]
    PrevHashMismatch { index: u64 },

    /// Stored hash differs from the recomputed digest.
    #[error("Hash mismatch at index {index}")]
    HashMismatch { index: u64 },

    /// Hash lacks the leading zeros its difficulty demands.
    #[error("Insufficient work at index {index}: need {difficulty} leading zeros")]
    InsufficientWork { index: u64, difficulty: u32 },

    /// Proof-of-work record declares less difficulty than the ledger requires.
    #[error("Difficulty {declared} below network difficulty {required}")]
    DifficultyBelowNetwork { declared: u32, required: u32 },

    /// The tail advanced while the candidate was being mined.
    #[error("Stale tail: candidate built on index {built_on}, tail is now {tail}")]
    StaleTail { built_on: u64, tail: u64 },

    /// Candidate chain does not start with a well-formed genesis record.
    #[error("Invalid genesis record")]
    InvalidGenesis,
}
