// Allow missing docs for internal items in development
#![allow(missing_docs)]

//! PC-02 API Gateway - HTTP interface to the ledger.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               API GATEWAY (pc-02)            │
//! ├──────────────────────────────────────────────┤
//! │  ┌────────────────────────────────────────┐  │
//! │  │   GET /    POST /    GET /health       │  │
//! │  └───────────────────┬────────────────────┘  │
//! │  ┌───────────────────┴────────────────────┐  │
//! │  │  Tracing → Timeout → BodyLimit         │  │
//! │  └───────────────────┬────────────────────┘  │
//! └──────────────────────┼───────────────────────┘
//!                        │ LedgerApi
//!                        ▼
//!                 pc-01-ledger
//! ```
//!
//! A rejected submission still answers 201 with the produced record unless
//! [`RejectionStatus::Conflict`] is configured; only a later `GET /` shows
//! whether it was appended.
//!
//! # Usage
//!
//! ```ignore
//! use pc_02_api_gateway::{ApiGatewayService, GatewayConfig};
//!
//! let service = ApiGatewayService::new(GatewayConfig::default(), ledger)?;
//! service.start(shutdown_rx).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod middleware;
pub mod router;
pub mod service;

// Re-exports for public API
pub use domain::config::{GatewayConfig, RejectionStatus};
pub use domain::error::GatewayError;
pub use router::{build_router, AppState};
pub use service::ApiGatewayService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
