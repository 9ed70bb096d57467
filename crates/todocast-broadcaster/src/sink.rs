//! Notification sinks, where received events end up.

use todocast_core::config::{BroadcasterMode, TelegramConfig};
use todocast_core::error::{Result, TodoCastError};

/// Delivery target, chosen once at startup.
#[derive(Debug)]
pub enum NotificationSink {
    /// Local log only. Never makes a network call.
    LogOnly,
    /// Telegram Bot API `sendMessage`.
    Forward(TelegramForwarder),
}

impl NotificationSink {
    pub fn from_mode(mode: &BroadcasterMode) -> Self {
        match mode {
            BroadcasterMode::LogOnly => Self::LogOnly,
            BroadcasterMode::Forward(tg) => Self::Forward(TelegramForwarder::new(tg.clone())),
        }
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            Self::LogOnly => "log-only",
            Self::Forward(_) => "forward",
        }
    }

    /// Deliver `message`. Never fails: forward errors are logged and
    /// swallowed.
    pub async fn deliver(&self, message: &str) {
        match self {
            Self::LogOnly => tracing::info!("(log-only) {message}"),
            Self::Forward(tg) => match tg.send(message).await {
                Ok(()) => tracing::info!("Telegram notification sent"),
                Err(e) => tracing::error!("Telegram notify failed: {e}"),
            },
        }
    }
}

/// Sends text to one Telegram chat.
#[derive(Debug)]
pub struct TelegramForwarder {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramForwarder {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.config.api_url, self.config.bot_token, method)
    }

    /// POST `text` to `sendMessage`. Network errors and non-2xx statuses
    /// are both errors.
    pub async fn send(&self, text: &str) -> Result<()> {
        let resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&serde_json::json!({
                "chat_id": self.config.chat_id,
                "text": text,
                "parse_mode": "HTML",
            }))
            .timeout(self.config.timeout)
            .send()
            .await
            // reqwest errors carry the URL, which embeds the bot token.
            .map_err(|e| TodoCastError::Transport(format!("sendMessage failed: {}", e.without_url())))?;

        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Err(TodoCastError::Transport(format!("Telegram API error {status}: {body}")))
        }
    }
}
