//! # Pulse-Chain Test Suite
//!
//! Cross-crate flows that need more than one subsystem running.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # criterion benchmarks for hashing, mining, validation
//! └── src/integration/  # real sockets against the gateways
//!     ├── support.rs    # raw HTTP client, line peer, harness helpers
//!     ├── http_flows.rs
//!     ├── tcp_flows.rs
//!     └── chain_sync.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pc-tests
//! cargo test -p pc-tests integration::tcp_flows
//! cargo bench -p pc-tests
//! ```

pub mod integration;
