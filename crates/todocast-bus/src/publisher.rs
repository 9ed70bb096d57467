//! Connect-per-publish NATS publisher.

use async_trait::async_trait;
use std::time::Duration;
use todocast_core::config::BusConfig;
use todocast_core::error::{Result, TodoCastError};
use todocast_core::traits::NotificationPublisher;

/// Publishes to a fixed subject. Every call opens its own connection,
/// sends, flushes and closes it; nothing is kept between calls.
#[derive(Debug, Clone)]
pub struct NatsPublisher {
    url: String,
    subject: String,
    connect_timeout: Duration,
}

impl NatsPublisher {
    pub fn new(config: &BusConfig) -> Self {
        Self {
            url: config.url.clone(),
            subject: config.subject.clone(),
            connect_timeout: config.connect_timeout,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

#[async_trait]
impl NotificationPublisher for NatsPublisher {
    fn name(&self) -> &str {
        "nats"
    }

    async fn publish(&self, payload: &str) -> Result<()> {
        let client = async_nats::ConnectOptions::new()
            .connection_timeout(self.connect_timeout)
            .connect(self.url.as_str())
            .await
            .map_err(|e| TodoCastError::Transport(format!("connect to {}: {e}", self.url)))?;

        client
            .publish(self.subject.clone(), payload.to_string().into())
            .await
            .map_err(|e| TodoCastError::Transport(format!("publish to {}: {e}", self.subject)))?;
        client
            .flush()
            .await
            .map_err(|e| TodoCastError::Transport(format!("flush: {e}")))?;

        // Last handle to the connection; dropping it closes the socket.
        drop(client);
        tracing::debug!(subject = %self.subject, "NATS connection closed after publish");
        Ok(())
    }
}
