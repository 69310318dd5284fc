//! Gateway configuration with validation.

use crate::domain::error::GatewayError;
use axum::http::StatusCode;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

/// Status returned when a produced record was not appended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RejectionStatus {
    /// 201, indistinguishable from acceptance
    #[default]
    Created,
    /// 409 with the rejected record as body
    Conflict,
}

impl RejectionStatus {
    /// HTTP status for a rejected submission.
    pub fn status_code(self) -> StatusCode {
        match self {
            Self::Created => StatusCode::CREATED,
            Self::Conflict => StatusCode::CONFLICT,
        }
    }
}

impl FromStr for RejectionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created" | "201" => Ok(Self::Created),
            "conflict" | "409" => Ok(Self::Conflict),
            other => Err(format!("unknown rejection status '{other}'")),
        }
    }
}

/// Main gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Listen address
    pub listen_addr: SocketAddr,
    /// Whole-request timeout
    pub request_timeout: Duration,
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
    /// Status for rejected submissions
    pub rejection_status: RejectionStatus,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080)),
            request_timeout: Duration::from_secs(10),
            max_body_bytes: 1 << 20,
            rejection_status: RejectionStatus::Created,
        }
    }
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.request_timeout.is_zero() {
            return Err(GatewayError::Config(
                "request_timeout must be greater than zero".into(),
            ));
        }
        if self.max_body_bytes == 0 {
            return Err(GatewayError::Config(
                "max_body_bytes must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GatewayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.max_body_bytes, 1_048_576);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = GatewayConfig {
            request_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_rejection_status_parsing() {
        assert_eq!("conflict".parse(), Ok(RejectionStatus::Conflict));
        assert_eq!(" Created ".parse(), Ok(RejectionStatus::Created));
        assert!("teapot".parse::<RejectionStatus>().is_err());
        assert_eq!(RejectionStatus::Conflict.status_code(), StatusCode::CONFLICT);
    }
}
