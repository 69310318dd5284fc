//! API Gateway error types.
//!
//! Request-level failures never reach this enum: handlers turn them into
//! status codes. These errors end the server.

use std::net::SocketAddr;
use thiserror::Error;

/// Fixed body for a response that could not be encoded.
pub const INTERNAL_SERVER_ERROR_BODY: &str = "HTTP 500: Internal Server Error";

/// Gateway service errors
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error on {addr}: {source}")]
    Bind {
        /// Address that could not be bound
        addr: SocketAddr,
        /// Underlying socket error
        source: std::io::Error,
    },

    /// Accept loop failed
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    /// Response encoding failed
    #[error("marshal error: {0}")]
    Marshal(#[from] serde_json::Error),
}
