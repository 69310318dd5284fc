//! # Node Configuration
//!
//! Everything the node reads from its environment, parsed once at startup.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `ADDR` | required | Bare port or full socket address |
//! | `PC_TRANSPORT` | `http` | `http` or `tcp` |
//! | `PC_CONSENSUS` | `pow` | `pow` or `plain` |
//! | `PC_DIFFICULTY` | `1` | Leading zero hex characters, at most 64 |
//! | `PC_GUARD` | `optimistic` | `optimistic` or `serialized` |
//! | `PC_MINING_DEADLINE_MS` | none | Bound on one nonce search |
//! | `PC_MINING_THROTTLE_MS` | none | Pause after each failed nonce |
//! | `PC_VALIDATE_REPLACEMENTS` | `false` | Validate chains before replacing |
//! | `PC_REJECTION_STATUS` | `created` | `created` or `conflict` |
//! | `PC_PUSH_INTERVAL_SECS` | `10` | Periodic TCP push |
//! | `PC_LOG_LEVEL` | `info` | Log filter when `RUST_LOG` is unset |
//!
//! A `.env` file in the working directory is loaded first; variables already
//! set in the environment take precedence over it.

use pc_01_ledger::{ConsensusMode, GuardMode, LedgerConfig, ReplacePolicy, MAX_DIFFICULTY};
use pc_02_api_gateway::{GatewayConfig, RejectionStatus};
use pc_03_line_gateway::LineGatewayConfig;
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Gateway variant the node serves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Transport {
    /// JSON over HTTP
    #[default]
    Http,
    /// Newline-delimited TCP sessions
    Tcp,
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "tcp" => Ok(Self::Tcp),
            other => Err(format!("unknown transport '{other}'")),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => f.write_str("http"),
            Self::Tcp => f.write_str("tcp"),
        }
    }
}

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Address the selected gateway binds.
    pub listen_addr: SocketAddr,
    /// Which gateway to serve.
    pub transport: Transport,
    /// Ledger configuration.
    pub ledger: LedgerConfig,
    /// HTTP gateway configuration.
    pub gateway: GatewayConfig,
    /// TCP line gateway configuration.
    pub line_gateway: LineGatewayConfig,
    /// Filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl NodeConfig {
    /// Configuration with defaults everywhere except the listen address.
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            transport: Transport::Http,
            ledger: LedgerConfig::default(),
            gateway: GatewayConfig {
                listen_addr,
                ..GatewayConfig::default()
            },
            line_gateway: LineGatewayConfig {
                listen_addr,
                ..LineGatewayConfig::default()
            },
            log_level: "info".to_string(),
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup("ADDR").ok_or(ConfigError::MissingAddr)?;
        let mut config = Self::new(parse_listen_addr(&addr)?);

        if let Some(value) = lookup("PC_TRANSPORT") {
            config.transport = parse_var("PC_TRANSPORT", &value)?;
        }
        if let Some(value) = lookup("PC_CONSENSUS") {
            config.ledger.mode = parse_var("PC_CONSENSUS", &value)?;
        }
        if let Some(value) = lookup("PC_DIFFICULTY") {
            let difficulty: u32 = parse_var("PC_DIFFICULTY", &value)?;
            if difficulty > MAX_DIFFICULTY {
                return Err(ConfigError::InvalidValue {
                    var: "PC_DIFFICULTY",
                    value,
                });
            }
            config.ledger.difficulty = difficulty;
        }
        if let Some(value) = lookup("PC_GUARD") {
            config.ledger.guard = parse_var::<GuardMode>("PC_GUARD", &value)?;
        }
        if let Some(value) = lookup("PC_MINING_DEADLINE_MS") {
            let ms: u64 = parse_var("PC_MINING_DEADLINE_MS", &value)?;
            config.ledger.mining_deadline = Some(Duration::from_millis(ms));
        }
        if let Some(value) = lookup("PC_MINING_THROTTLE_MS") {
            let ms: u64 = parse_var("PC_MINING_THROTTLE_MS", &value)?;
            config.ledger.mining_throttle = Some(Duration::from_millis(ms));
        }
        if let Some(value) = lookup("PC_VALIDATE_REPLACEMENTS") {
            let validate: bool = parse_var("PC_VALIDATE_REPLACEMENTS", &value)?;
            config.ledger.replace_policy = if validate {
                ReplacePolicy::Validated
            } else {
                ReplacePolicy::LengthOnly
            };
        }
        if let Some(value) = lookup("PC_REJECTION_STATUS") {
            config.gateway.rejection_status =
                parse_var::<RejectionStatus>("PC_REJECTION_STATUS", &value)?;
        }
        if let Some(value) = lookup("PC_PUSH_INTERVAL_SECS") {
            let secs: u64 = parse_var("PC_PUSH_INTERVAL_SECS", &value)?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    var: "PC_PUSH_INTERVAL_SECS",
                    value,
                });
            }
            config.line_gateway.push_interval = Duration::from_secs(secs);
        }
        if let Some(value) = lookup("PC_LOG_LEVEL") {
            config.log_level = value;
        }

        Ok(config)
    }

    /// Whether records are mined.
    pub fn is_proof_of_work(&self) -> bool {
        self.ledger.mode == ConsensusMode::Pow
    }
}

/// Load `.env` from the working directory. Returns the path when a file was
/// read; a missing file is not an error.
pub fn load_env_file() -> Result<Option<PathBuf>, dotenvy::Error> {
    load_env_file_from(Path::new(".env"))
}

/// Load variables from `path` without overriding ones already set.
pub fn load_env_file_from(path: &Path) -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(Some(path.to_path_buf())),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Accepts `8080`, `:8080` or `127.0.0.1:8080`. A bare port binds every
/// interface.
pub fn parse_listen_addr(raw: &str) -> Result<SocketAddr, ConfigError> {
    let trimmed = raw.trim();
    let port_only = trimmed.strip_prefix(':').unwrap_or(trimmed);
    if let Ok(port) = port_only.parse::<u16>() {
        return Ok(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)));
    }
    trimmed
        .parse()
        .map_err(|_| ConfigError::InvalidAddr(raw.to_string()))
}

fn parse_var<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
    })
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `ADDR` is not set.
    #[error("ADDR is not set; export ADDR=<port> or ADDR=<ip:port>")]
    MissingAddr,

    /// `ADDR` is neither a port nor a socket address.
    #[error("ADDR '{0}' is not a port or socket address")]
    InvalidAddr(String),

    /// An optional variable holds an unusable value.
    #[error("{var}='{value}' is not a valid value")]
    InvalidValue {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
    },
}
