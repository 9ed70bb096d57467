//! Reminder job. Adds a todo pointing at a random article.

use std::time::Duration;
use todocast_core::config::ReminderConfig;
use todocast_core::error::{Result, TodoCastError};
use todocast_core::traits::TodoStore;

const USER_AGENT: &str = "TodoCastReminder/1.0";

/// Follow redirects from `wiki_url` and return where they end up.
pub async fn random_article_url(wiki_url: &str) -> Result<String> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| TodoCastError::Config(format!("HTTP client: {e}")))?;
    let resp = client
        .get(wiki_url)
        .send()
        .await
        .map_err(|e| TodoCastError::Transport(format!("fetch {wiki_url}: {e}")))?;
    Ok(resp.url().to_string())
}

/// Insert `Read <url>` straight into the store. Bypasses the backend, so
/// no length limit applies and no notification is published.
pub async fn run(config: &ReminderConfig, store: &dyn TodoStore) -> Result<i64> {
    let url = random_article_url(&config.wiki_url).await?;
    let item = format!("Read {url}");
    let id = store.insert(&item).await?;
    tracing::info!(id, "Reminder added: {item}");
    Ok(id)
}
