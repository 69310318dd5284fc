//! Hexagonal architecture ports (interfaces)

pub mod inbound;

pub use inbound::*;
