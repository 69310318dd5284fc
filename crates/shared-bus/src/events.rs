//! # Chain Events
//!
//! Everything the ledger announces to its subscribers.

use serde::{Deserialize, Serialize};
use shared_types::{Block, BlockHash, RejectionReason};

/// Events published by the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ChainEvent {
    /// The genesis record was installed at startup.
    GenesisInitialized(Block),

    /// A candidate passed validation and became the new tail.
    BlockAppended(Block),

    /// The whole chain was swapped for a strictly longer one.
    ChainReplaced {
        /// Length of the installed chain.
        length: usize,
        /// Hash of the new tail.
        tail_hash: BlockHash,
    },

    /// A candidate was dropped. The chain is unchanged.
    BlockRejected {
        /// The dropped candidate.
        block: Block,
        /// Why it was dropped.
        reason: RejectionReason,
    },
}

impl ChainEvent {
    /// Topic used for filtering.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::GenesisInitialized(_) | Self::BlockAppended(_) | Self::ChainReplaced { .. } => {
                EventTopic::ChainChanged
            }
            Self::BlockRejected { .. } => EventTopic::Rejections,
        }
    }

    /// Whether the chain's contents differ after this event.
    #[must_use]
    pub fn changes_chain(&self) -> bool {
        self.topic() == EventTopic::ChainChanged
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Genesis, append and replace.
    ChainChanged,
    /// Dropped candidates.
    Rejections,
    /// Wildcard.
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include (empty = all).
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Only events after which the chain differs.
    #[must_use]
    pub fn chain_changes() -> Self {
        Self::topics(vec![EventTopic::ChainChanged])
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &ChainEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
