//! # Shared Types Crate
//!
//! This crate contains the ledger record (`Block`), the submission payload
//! accepted by the gateways, and the error/rejection vocabulary that crosses
//! crate boundaries.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the JSON wire format of a record is defined
//!   here and nowhere else.
//! - **Immutable Records**: a `Block` is built once by the ledger core and then
//!   only ever cloned or borrowed.

pub mod entities;
pub mod errors;
pub mod wire;

pub use entities::*;
pub use errors::*;
pub use wire::to_pretty_json;
