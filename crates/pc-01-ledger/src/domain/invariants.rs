//! Invariant checkers for ledger records
//!
//! Each check compares a candidate against its predecessor (or, for the
//! genesis record, against the sentinel) and reports a [`RejectionReason`] on
//! failure. Nothing here mutates its inputs.

use crate::utils::hashing::{calculate_hash, meets_difficulty};
use shared_types::{Block, RejectionReason};

/// Index continuity: the candidate sits directly after its predecessor.
pub fn check_index(candidate: &Block, prev: &Block) -> Result<(), RejectionReason> {
    let expected = prev.index + 1;
    if candidate.index != expected {
        return Err(RejectionReason::IndexMismatch {
            expected,
            actual: candidate.index,
        });
    }
    Ok(())
}

/// Hash linkage: the candidate points at its predecessor's digest.
pub fn check_linkage(candidate: &Block, prev: &Block) -> Result<(), RejectionReason> {
    if candidate.prev_hash != prev.hash {
        return Err(RejectionReason::PrevHashMismatch {
            index: candidate.index,
        });
    }
    Ok(())
}

/// Self-hash integrity: the stored digest matches a fresh recomputation.
pub fn check_hash(candidate: &Block) -> Result<(), RejectionReason> {
    if calculate_hash(candidate) != candidate.hash {
        return Err(RejectionReason::HashMismatch {
            index: candidate.index,
        });
    }
    Ok(())
}

/// Work: a proof-of-work record's hash satisfies its declared difficulty.
///
/// Records without a difficulty have nothing to prove.
pub fn check_work(candidate: &Block) -> Result<(), RejectionReason> {
    match candidate.difficulty {
        Some(difficulty) if !meets_difficulty(&candidate.hash, difficulty) => {
            Err(RejectionReason::InsufficientWork {
                index: candidate.index,
                difficulty,
            })
        }
        _ => Ok(()),
    }
}

/// Network difficulty: a proof-of-work ledger refuses records that declare
/// less work than it requires.
pub fn check_network_difficulty(
    candidate: &Block,
    required: Option<u32>,
) -> Result<(), RejectionReason> {
    let Some(required) = required else {
        return Ok(());
    };
    let declared = candidate.difficulty.unwrap_or(0);
    if declared < required {
        return Err(RejectionReason::DifficultyBelowNetwork { declared, required });
    }
    Ok(())
}

/// Genesis shape: index 0 behind the sentinel with a self-consistent hash.
///
/// Genesis carries no work requirement.
pub fn check_genesis(block: &Block) -> Result<(), RejectionReason> {
    if !block.is_genesis() || calculate_hash(block) != block.hash {
        return Err(RejectionReason::InvalidGenesis);
    }
    Ok(())
}

/// Genesis mode: a proof-of-work ledger's genesis carries `Difficulty` and
/// `Nonce`, a plain ledger's genesis carries neither.
pub fn check_genesis_mode(block: &Block, required: Option<u32>) -> Result<(), RejectionReason> {
    let matches_mode = match required {
        Some(_) => block.difficulty.is_some() && block.nonce.is_some(),
        None => block.difficulty.is_none() && block.nonce.is_none(),
    };
    if !matches_mode {
        return Err(RejectionReason::InvalidGenesis);
    }
    Ok(())
}
