//! # Shared Bus - Chain Change Notifications
//!
//! Publish/subscribe registry connecting the ledger core to every live
//! gateway session.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ LedgerService│                    │  Session N   │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! Each session registers a [`Subscription`] when it connects and the
//! registration is released when the subscription is dropped. The ledger
//! publishes after every successful append or replace.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{ChainEvent, EventFilter, EventTopic};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{Subscription, SubscriptionError};

/// Events buffered per subscriber before the slowest one starts lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
