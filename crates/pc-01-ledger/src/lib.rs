//! # Pulse-Chain - Ledger Core (Subsystem 01)
//!
//! **Bounded Context:** Record production, validation and chain ownership
//!
//! ## Purpose
//!
//! The ledger appends tamper-evident BPM readings. Each record points at the
//! digest of its predecessor; on a proof-of-work ledger each record's own
//! digest must also start with a fixed number of `'0'` hex characters.
//! Competing histories are resolved by the longest-chain rule.
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Service (Outer)                                    │
//! │  - LedgerService: locking, mining task, events      │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports (Middle)                                     │
//! │  - Inbound: LedgerApi, SubmitOutcome                │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (Inner - Pure Logic)                        │
//! │  - Chain, BlockValidator, PoWMiner                  │
//! │  - Invariants: index, linkage, hash, work           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Record Invariants
//!
//! 1. **Index continuity**: `index == prev.index + 1`
//! 2. **Linkage**: `prev_hash == prev.hash`
//! 3. **Integrity**: `hash == sha256(index ++ timestamp ++ bpm ++ prev_hash ++ nonce)`
//! 4. **Work**: `hash` has at least `difficulty` leading `'0'` characters
//! 5. **Genesis**: the chain always starts with index 0 behind `"Genesis!"`
//!
//! Invalid candidates are dropped and reported as
//! [`SubmitOutcome::Rejected`]; they never surface as errors.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use pc_01_ledger::{LedgerApi, LedgerConfig, LedgerService};
//! use shared_bus::InMemoryEventBus;
//! use std::sync::Arc;
//!
//! let bus = Arc::new(InMemoryEventBus::new());
//! let ledger = LedgerService::new(bus, LedgerConfig::proof_of_work(1))?;
//! let outcome = ledger.submit(72).await?;
//! assert!(outcome.block().hash.starts_with('0'));
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;
pub mod utils;

pub use config::{ConsensusMode, GuardMode, LedgerConfig, ReplacePolicy};
pub use domain::{BlockValidator, Chain, MiningCancel, PoWMiner};
pub use error::{LedgerError, Result};
pub use ports::{LedgerApi, SubmitOutcome};
pub use service::{now_timestamp, LedgerService};

/// Leading zeros required when no difficulty is configured
pub const DEFAULT_DIFFICULTY: u32 = 1;

/// Highest satisfiable difficulty: a SHA-256 hex digest has 64 characters
pub const MAX_DIFFICULTY: u32 = 64;
