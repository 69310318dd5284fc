//! # Integration Tests
//!
//! Every test binds ephemeral ports on 127.0.0.1 and talks to the gateways
//! the way a client would.

#[cfg(test)]
mod support;

#[cfg(test)]
mod chain_sync;
#[cfg(test)]
mod http_flows;
#[cfg(test)]
mod tcp_flows;
