//! # TodoCast Broadcaster
//! Consumes todo change events as one member of a queue group and relays
//! each one to a [`NotificationSink`].
//!
//! Delivery is best effort: one attempt per message, failures are logged
//! and dropped, and the loop keeps going.

pub mod dispatch;
pub mod sink;

pub use dispatch::Broadcaster;
pub use sink::{NotificationSink, TelegramForwarder};
