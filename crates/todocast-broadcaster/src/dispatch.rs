//! Dispatch loop. One message at a time, in receipt order.

use futures::stream::{Stream, StreamExt};
use std::sync::Arc;
use todocast_core::types::InboundMessage;
use tokio::sync::Notify;

use crate::sink::NotificationSink;

/// Broadcaster state machine once subscribed: receive → decode → deliver,
/// until the stream ends or the shutdown handle fires.
pub struct Broadcaster {
    sink: NotificationSink,
    shutdown: Arc<Notify>,
}

impl Broadcaster {
    pub fn new(sink: NotificationSink) -> Self {
        Self {
            sink,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Handle that stops [`run`](Self::run). Calling `notify_one()` before
    /// the loop starts is fine; the stop is remembered.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    /// Decode and deliver one message. Returns `false` when the payload
    /// is not valid UTF-8 and was dropped.
    pub async fn handle(&self, message: &InboundMessage) -> bool {
        let text = match std::str::from_utf8(&message.payload) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(subject = %message.subject, "Dropping non-UTF-8 message: {e}");
                return false;
            }
        };
        tracing::info!("Received: {text}");
        self.sink.deliver(text).await;
        true
    }

    /// Consume `messages` until the stream ends or shutdown is requested.
    /// Returns the number of messages delivered.
    ///
    /// A message already being delivered is finished before shutdown is
    /// observed.
    pub async fn run<S>(&self, mut messages: S) -> usize
    where
        S: Stream<Item = InboundMessage> + Unpin,
    {
        tracing::info!("Broadcaster dispatch loop started (mode={})", self.sink.mode_name());
        let mut delivered = 0;

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.notified() => {
                    tracing::info!("Broadcaster stopping (shutdown requested)");
                    break;
                }
                next = messages.next() => match next {
                    Some(message) => {
                        if self.handle(&message).await {
                            delivered += 1;
                        }
                    }
                    None => {
                        tracing::warn!("Message stream ended");
                        break;
                    }
                },
            }
        }

        delivered
    }
}
