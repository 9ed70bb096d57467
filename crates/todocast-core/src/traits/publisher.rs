//! Producer side of the notification bus.

use async_trait::async_trait;

use crate::error::Result;

/// Fire-and-forget publisher. The subject is fixed by the implementation.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    fn name(&self) -> &str;

    /// Send `payload`. Returns once the transport has flushed it; never
    /// waits for a consumer.
    async fn publish(&self, payload: &str) -> Result<()>;
}
