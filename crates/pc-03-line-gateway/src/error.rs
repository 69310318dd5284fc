//! Line gateway error types.
//!
//! Per-line failures (unparsable BPM, rejected record) are logged by the
//! session and never surface here.

use std::net::SocketAddr;
use thiserror::Error;

/// Line gateway service errors
#[derive(Debug, Error)]
pub enum LineGatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Listener could not be bound
    #[error("server bind error on {addr}: {source}")]
    Bind {
        /// Address that could not be bound
        addr: SocketAddr,
        /// Underlying socket error
        source: std::io::Error,
    },

    /// Socket I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Chain could not be encoded for a peer
    #[error("marshal error: {0}")]
    Marshal(#[from] serde_json::Error),
}
