//! Capability traits implemented by the store and bus crates.

pub mod publisher;
pub mod store;

pub use publisher::NotificationPublisher;
pub use store::TodoStore;
