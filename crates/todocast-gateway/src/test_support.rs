//! Fake publishers for backend tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use todocast_core::error::{Result, TodoCastError};
use todocast_core::traits::NotificationPublisher;

/// Remembers every payload it was asked to publish.
#[derive(Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<String>>,
}

impl RecordingPublisher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }

    /// Poll until at least `n` payloads arrived, giving up after ~2 s.
    pub async fn wait_for(&self, n: usize) -> Vec<String> {
        for _ in 0..200 {
            let published = self.published();
            if published.len() >= n {
                return published;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.published()
    }
}

#[async_trait]
impl NotificationPublisher for RecordingPublisher {
    fn name(&self) -> &str {
        "recording"
    }

    async fn publish(&self, payload: &str) -> Result<()> {
        self.published.lock().unwrap().push(payload.to_string());
        Ok(())
    }
}

/// Counts attempts and always fails, like a publisher with no broker.
#[derive(Default)]
pub struct FailingPublisher {
    attempts: Mutex<usize>,
}

impl FailingPublisher {
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl NotificationPublisher for FailingPublisher {
    fn name(&self) -> &str {
        "failing"
    }

    async fn publish(&self, _payload: &str) -> Result<()> {
        *self.attempts.lock().unwrap() += 1;
        Err(TodoCastError::Transport("connection refused".into()))
    }
}

/// Holds every publish until [`release`](Self::release) is called,
/// like a broker that accepts the connection and then stalls.
#[derive(Default)]
pub struct GatedPublisher {
    gate: tokio::sync::Notify,
    pub inner: RecordingPublisher,
}

impl GatedPublisher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl NotificationPublisher for GatedPublisher {
    fn name(&self) -> &str {
        "gated"
    }

    async fn publish(&self, payload: &str) -> Result<()> {
        self.gate.notified().await;
        self.inner.publish(payload).await
    }
}

/// A store whose every statement fails, like a dropped database session.
pub struct BrokenStore;

#[async_trait]
impl todocast_core::traits::TodoStore for BrokenStore {
    fn name(&self) -> &str {
        "broken"
    }

    async fn list(&self) -> Result<Vec<todocast_core::types::TodoItem>> {
        Err(TodoCastError::Store("server closed the connection".into()))
    }

    async fn insert(&self, _item: &str) -> Result<i64> {
        Err(TodoCastError::Store("server closed the connection".into()))
    }

    async fn item_text(&self, _id: i64) -> Result<Option<String>> {
        Err(TodoCastError::Store("server closed the connection".into()))
    }

    async fn mark_done(&self, _id: i64) -> Result<u64> {
        Err(TodoCastError::Store("server closed the connection".into()))
    }

    async fn ping(&self) -> Result<()> {
        Err(TodoCastError::Store("server closed the connection".into()))
    }
}
