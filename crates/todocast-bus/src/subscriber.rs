//! Queue-group subscription.

use futures::stream::{Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
use todocast_core::config::BusConfig;
use todocast_core::error::{Result, TodoCastError};
use todocast_core::types::InboundMessage;

/// Messages delivered to this member of the queue group.
///
/// Owns the client so the connection stays up for as long as the stream
/// is alive. Ends when the connection is closed by the server.
pub struct QueueSubscription {
    _client: async_nats::Client,
    subscriber: async_nats::Subscriber,
}

impl Stream for QueueSubscription {
    type Item = InboundMessage;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.subscriber.poll_next_unpin(cx).map(|msg| {
            msg.map(|m| InboundMessage {
                subject: m.subject.to_string(),
                payload: m.payload.to_vec(),
            })
        })
    }
}

/// Connect and join `config.queue_group` on `config.subject`.
///
/// Any failure here is fatal to the caller; there is no reconnect loop
/// around the initial connect.
pub async fn subscribe(config: &BusConfig) -> Result<QueueSubscription> {
    let client = async_nats::ConnectOptions::new()
        .connection_timeout(config.connect_timeout)
        .connect(config.url.as_str())
        .await
        .map_err(|e| TodoCastError::Transport(format!("connect to {}: {e}", config.url)))?;
    tracing::info!("Connected to NATS at {}", config.url);

    let subscriber = client
        .queue_subscribe(config.subject.clone(), config.queue_group.clone())
        .await
        .map_err(|e| {
            TodoCastError::Transport(format!("subscribe to {}: {e}", config.subject))
        })?;
    tracing::info!(
        "Subscriber started (subject={}, queue={})",
        config.subject,
        config.queue_group
    );

    Ok(QueueSubscription {
        _client: client,
        subscriber,
    })
}
