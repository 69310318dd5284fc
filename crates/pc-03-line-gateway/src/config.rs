//! Line gateway configuration.

use crate::error::LineGatewayError;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// First thing every peer reads.
pub const PROMPT: &str = "Enter a new BPM:";

/// Sent after each submitted line.
pub const REPROMPT: &str = "\n Enter a new BPM:";

/// Line gateway configuration
#[derive(Debug, Clone)]
pub struct LineGatewayConfig {
    /// Listen address
    pub listen_addr: SocketAddr,
    /// Period of the unprompted full-chain push to each peer
    pub push_interval: Duration,
    /// How long a closing session may spend flushing queued output
    pub drain_timeout: Duration,
}

impl Default for LineGatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 9000)),
            push_interval: Duration::from_secs(10),
            drain_timeout: Duration::from_secs(5),
        }
    }
}

impl LineGatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), LineGatewayError> {
        if self.push_interval.is_zero() {
            return Err(LineGatewayError::Config(
                "push_interval must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
