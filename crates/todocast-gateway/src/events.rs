//! Change-event delivery, off the request path.
//!
//! Handlers push a [`TodoEvent`] and return. One background task drains
//! the queue in push order and makes exactly one publish attempt per
//! event, so a slow or unreachable broker never holds up a response.

use std::sync::Arc;
use todocast_core::traits::NotificationPublisher;
use todocast_core::types::TodoEvent;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Sending half of the event queue. Cheap to clone.
#[derive(Clone)]
pub struct EventQueue {
    tx: mpsc::UnboundedSender<TodoEvent>,
}

impl EventQueue {
    /// Start the publisher task. It ends once every `EventQueue` clone is
    /// dropped and the queue is empty.
    pub fn spawn(publisher: Arc<dyn NotificationPublisher>) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<TodoEvent>();

        let worker = tokio::spawn(async move {
            tracing::debug!("Event publisher started ({})", publisher.name());
            while let Some(event) = rx.recv().await {
                let payload = event.to_string();
                match publisher.publish(&payload).await {
                    Ok(()) => tracing::info!("Published to NATS: {payload}"),
                    Err(e) => tracing::error!("NATS publish failed: {e}"),
                }
            }
            tracing::debug!("Event publisher stopped (queue closed)");
        });

        (Self { tx }, worker)
    }

    pub fn push(&self, event: TodoEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::error!("NATS publish failed: event queue closed, dropping {}", e.0);
        }
    }
}
