//! Gateway domain: configuration and errors.

pub mod config;
pub mod error;

pub use config::{GatewayConfig, RejectionStatus};
pub use error::GatewayError;
