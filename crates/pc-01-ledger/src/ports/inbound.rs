//! Inbound ports (driving side - API)

use crate::error::Result;
use async_trait::async_trait;
use shared_types::{Block, Bpm, RejectionReason};

/// What happened to a submitted reading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The record became the new tail.
    Accepted(Block),
    /// The record was produced but dropped; the chain is unchanged.
    Rejected {
        /// The dropped record
        block: Block,
        /// First failed check
        reason: RejectionReason,
    },
}

impl SubmitOutcome {
    /// The produced record, appended or not.
    pub fn block(&self) -> &Block {
        match self {
            Self::Accepted(block) | Self::Rejected { block, .. } => block,
        }
    }

    /// Consume into the produced record.
    pub fn into_block(self) -> Block {
        match self {
            Self::Accepted(block) | Self::Rejected { block, .. } => block,
        }
    }

    /// Whether the record was appended.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Primary port: the ledger as seen by gateways
#[async_trait]
pub trait LedgerApi: Send + Sync {
    /// Produce a record for `bpm` on top of the tail and try to append it.
    async fn submit(&self, bpm: Bpm) -> Result<SubmitOutcome>;

    /// Snapshot of every record in chain order.
    async fn blocks(&self) -> Vec<Block>;

    /// Current last record.
    async fn tail(&self) -> Result<Block>;

    /// Install `candidate` if strictly longer (and valid, when configured).
    async fn replace(&self, candidate: Vec<Block>) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::GENESIS_PREV_HASH;

    fn block() -> Block {
        Block {
            index: 1,
            timestamp: "t1".into(),
            bpm: 60,
            hash: "h".into(),
            prev_hash: GENESIS_PREV_HASH.into(),
            difficulty: None,
            nonce: None,
        }
    }

    #[test]
    fn test_outcome_exposes_block_either_way() {
        let accepted = SubmitOutcome::Accepted(block());
        let rejected = SubmitOutcome::Rejected {
            block: block(),
            reason: RejectionReason::HashMismatch { index: 1 },
        };
        assert!(accepted.is_accepted());
        assert!(!rejected.is_accepted());
        assert_eq!(accepted.block(), rejected.block());
        assert_eq!(rejected.into_block(), block());
    }
}
