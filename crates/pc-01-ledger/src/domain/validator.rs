//! Record validation
//!
//! Checks run cheapest first and stop at the first failure:
//!
//! ```text
//! index continuity ─► hash linkage ─► hash recomputation ─► work
//! ```

use super::invariants::{check_genesis, check_hash, check_index, check_linkage, check_work};
use shared_types::{Block, RejectionReason};

/// Stateless validator for candidates and whole chains.
pub struct BlockValidator;

impl BlockValidator {
    /// Whether `candidate` may follow `prev`.
    pub fn is_valid(candidate: &Block, prev: &Block) -> bool {
        Self::check(candidate, prev).is_ok()
    }

    /// Same as [`Self::is_valid`] but names the first failing check.
    pub fn check(candidate: &Block, prev: &Block) -> Result<(), RejectionReason> {
        check_index(candidate, prev)?;
        check_linkage(candidate, prev)?;
        check_hash(candidate)?;
        check_work(candidate)
    }

    /// Validates a full sequence: well-formed genesis, then every link.
    pub fn validate_chain(blocks: &[Block]) -> Result<(), RejectionReason> {
        let genesis = blocks.first().ok_or(RejectionReason::InvalidGenesis)?;
        check_genesis(genesis)?;
        for pair in blocks.windows(2) {
            Self::check(&pair[1], &pair[0])?;
        }
        Ok(())
    }
}
