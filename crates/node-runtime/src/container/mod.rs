//! # Subsystem Container
//!
//! Holds the configuration and the shared instances every gateway is wired
//! to: one event bus and one ledger.

pub mod config;
pub mod subsystems;

pub use config::{load_env_file, parse_listen_addr, ConfigError, NodeConfig, Transport};
pub use subsystems::SubsystemContainer;
