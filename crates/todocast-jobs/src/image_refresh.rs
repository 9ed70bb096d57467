//! Image refresh loop.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use todocast_core::config::ImageRefreshConfig;
use todocast_core::error::{Result, TodoCastError};
use tokio::sync::Notify;

/// Downloads `image_url` to `write_path` every `interval`.
pub struct ImageRefresher {
    config: ImageRefreshConfig,
    client: reqwest::Client,
    shutdown: Arc<Notify>,
}

impl ImageRefresher {
    pub fn new(config: ImageRefreshConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TodoCastError::Config(format!("HTTP client: {e}")))?;
        Ok(Self {
            config,
            client,
            shutdown: Arc::new(Notify::new()),
        })
    }

    pub fn shutdown_handle(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    /// Fetch once and replace the image. Returns the number of bytes written.
    pub async fn refresh_once(&self) -> Result<usize> {
        let resp = self
            .client
            .get(&self.config.image_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| TodoCastError::Transport(format!("fetch {}: {e}", self.config.image_url)))?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| TodoCastError::Transport(format!("read image body: {e}")))?;

        write_replacing(&self.config.write_path, &bytes).await?;
        Ok(bytes.len())
    }

    /// Refresh, sleep, repeat until shutdown. Failures are logged and the
    /// next round still runs. Returns the number of successful refreshes.
    pub async fn run(&self) -> usize {
        tracing::info!(
            "Image refresh started (every {}s → {})",
            self.config.interval.as_secs(),
            self.config.write_path.display()
        );
        let mut saved = 0;

        loop {
            match self.refresh_once().await {
                Ok(len) => {
                    saved += 1;
                    tracing::info!(bytes = len, "Saved image");
                }
                Err(e) => tracing::error!("Image refresh failed: {e}"),
            }

            tokio::select! {
                _ = self.shutdown.notified() => {
                    tracing::info!("Image refresh stopped");
                    break;
                }
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }

        saved
    }
}

/// Write through a sibling temp file so readers never see half an image.
async fn write_replacing(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp = temp_sibling(path);
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".into());
    path.with_file_name(format!(".{name}.tmp"))
}
