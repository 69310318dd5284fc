//! Error types for the ledger subsystem

use shared_types::EmptyChainError;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while producing or committing records.
///
/// Validation failures are not errors: a dropped candidate is reported through
/// [`crate::SubmitOutcome::Rejected`].
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Tail requested before genesis was installed
    #[error(transparent)]
    EmptyChain(#[from] EmptyChainError),

    /// Mining was aborted through its cancellation flag
    #[error("Mining cancelled after {attempts} attempts")]
    MiningCancelled {
        /// Nonces tried before the abort
        attempts: u64,
    },

    /// Mining ran past its deadline
    #[error("Mining deadline exceeded after {attempts} attempts")]
    MiningDeadlineExceeded {
        /// Nonces tried before the deadline
        attempts: u64,
    },

    /// Nonce space exhausted without meeting the difficulty
    #[error("Mining failed: no valid nonce found")]
    MiningFailed,

    /// Genesis record could not be installed
    #[error("Invalid genesis record: {0}")]
    InvalidGenesis(String),

    /// Configuration the ledger cannot run with
    #[error("Invalid ledger configuration: {0}")]
    InvalidConfig(String),

    /// Internal error (task join failure, poisoned state)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Whether the error came from an aborted search rather than a fault.
    pub fn is_mining_abort(&self) -> bool {
        matches!(
            self,
            Self::MiningCancelled { .. } | Self::MiningDeadlineExceeded { .. }
        )
    }
}
