//! Middleware stack for the API Gateway.
//!
//! Layer order: Request → Tracing → Timeout → BodyLimit → Handler

pub mod timeout;
pub mod tracing;

pub use timeout::TimeoutLayer;
pub use tracing::TracingLayer;
