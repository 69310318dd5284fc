//! The chain aggregate
//!
//! Append-only from the outside, replaceable wholesale by a strictly longer
//! sequence. Invalid candidates are dropped and reported, never raised.

use super::invariants::{check_genesis, check_genesis_mode, check_network_difficulty};
use super::validator::BlockValidator;
use crate::config::ReplacePolicy;
use shared_types::{Block, EmptyChainError, RejectionReason};
use tracing::warn;

/// Ordered sequence of records.
#[derive(Debug, Clone, Default)]
pub struct Chain {
    blocks: Vec<Block>,
    /// Difficulty appended records must declare (proof-of-work ledgers)
    required_difficulty: Option<u32>,
    replace_policy: ReplacePolicy,
}

impl Chain {
    /// Empty chain. Install genesis before use.
    pub fn new(required_difficulty: Option<u32>, replace_policy: ReplacePolicy) -> Self {
        Self {
            blocks: Vec::new(),
            required_difficulty,
            replace_policy,
        }
    }

    /// Chain holding only `genesis`.
    pub fn with_genesis(
        genesis: Block,
        required_difficulty: Option<u32>,
        replace_policy: ReplacePolicy,
    ) -> Result<Self, RejectionReason> {
        let mut chain = Self::new(required_difficulty, replace_policy);
        chain.install_genesis(genesis)?;
        Ok(chain)
    }

    /// Installs the genesis record. Only valid on an empty chain.
    pub fn install_genesis(&mut self, genesis: Block) -> Result<(), RejectionReason> {
        if !self.blocks.is_empty() {
            return Err(RejectionReason::InvalidGenesis);
        }
        check_genesis(&genesis)?;
        check_genesis_mode(&genesis, self.required_difficulty)?;
        self.blocks.push(genesis);
        Ok(())
    }

    /// Last record.
    pub fn tail(&self) -> Result<&Block, EmptyChainError> {
        self.blocks.last().ok_or(EmptyChainError)
    }

    /// Appends `candidate` if it validly follows the tail.
    ///
    /// On failure the chain is unchanged and the reason is logged and returned.
    pub fn append(&mut self, candidate: Block) -> Result<(), RejectionReason> {
        let verdict = match self.blocks.last() {
            Some(tail) => BlockValidator::check(&candidate, tail)
                .and_then(|()| check_network_difficulty(&candidate, self.required_difficulty)),
            None => Err(RejectionReason::InvalidGenesis),
        };

        match verdict {
            Ok(()) => {
                self.blocks.push(candidate);
                Ok(())
            }
            Err(reason) => {
                warn!(index = candidate.index, %reason, "Dropping invalid record");
                Err(reason)
            }
        }
    }

    /// Installs `candidate` iff it is strictly longer than the current chain.
    ///
    /// With [`ReplacePolicy::Validated`] every link must also validate and
    /// meet this ledger's difficulty.
    pub fn replace(&mut self, candidate: Vec<Block>) -> bool {
        if candidate.len() <= self.blocks.len() {
            return false;
        }
        if self.replace_policy == ReplacePolicy::Validated {
            if let Err(reason) = self.check_replacement(&candidate) {
                warn!(length = candidate.len(), %reason, "Refusing invalid replacement chain");
                return false;
            }
        }
        self.blocks = candidate;
        true
    }

    fn check_replacement(&self, candidate: &[Block]) -> Result<(), RejectionReason> {
        BlockValidator::validate_chain(candidate)?;
        if let Some(genesis) = candidate.first() {
            check_genesis_mode(genesis, self.required_difficulty)?;
        }
        candidate
            .iter()
            .skip(1)
            .try_for_each(|block| check_network_difficulty(block, self.required_difficulty))
    }

    /// All records in chain order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether genesis is still missing.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
