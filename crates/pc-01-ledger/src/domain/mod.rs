//! Domain layer - Pure ledger logic
//!
//! Nothing here performs I/O or awaits. Locking and event publication live in
//! [`crate::service`].
//!
//! ## Services
//!
//! - [`Chain`]: ordered records, append and longest-chain replace
//! - [`BlockValidator`]: candidate and whole-chain validation
//! - [`PoWMiner`]: nonce search with cancellation and deadline
//! - [`generate_block`]: plain record production

pub mod chain;
pub mod genesis;
pub mod invariants;
pub mod miner;
pub mod validator;

pub use chain::Chain;
pub use genesis::create_genesis_block;
pub use invariants::*;
pub use miner::{generate_block, CancelOnDrop, MiningCancel, PoWMiner};
pub use validator::BlockValidator;
