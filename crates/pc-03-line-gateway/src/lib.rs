//! PC-03 Line Gateway - TCP line protocol to the ledger.
//!
//! # Protocol
//!
//! ```text
//! server → "Enter a new BPM:"
//! client → "72\n"
//! server → whole chain (pretty JSON) to every connected peer
//! server → "\n Enter a new BPM:"
//! ...
//! server → whole chain (compact JSON) every push interval, unprompted
//! ```
//!
//! A line that is not an integer is logged and ignored; the session stays
//! open. Each session owns three background flows (writer, broadcaster,
//! pusher) that end together when the peer goes away.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod service;
pub mod session;

pub use config::{LineGatewayConfig, PROMPT, REPROMPT};
pub use error::LineGatewayError;
pub use service::LineGatewayService;
pub use session::{encode_chain, parse_bpm, Session};
