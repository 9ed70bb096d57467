//! # TodoCast Bus
//! Notification bus over NATS.
//!
//! ```text
//! todo backend ──publish(subject)──▶ NATS ──queue group──▶ broadcaster #1
//!                                               └────────▶ broadcaster #2
//! ```
//!
//! Each message reaches at most one member of a queue group. Nothing is
//! persisted by the broker, and there is no ordering across publishers.

pub mod publisher;
pub mod subscriber;

pub use publisher::NatsPublisher;
pub use subscriber::{QueueSubscription, subscribe};
