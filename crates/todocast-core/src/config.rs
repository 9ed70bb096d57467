//! TodoCast configuration, read from environment variables.
//!
//! Every service reads its settings from the process environment at
//! startup. Each config type also exposes `from_lookup`, which takes any
//! `key -> value` function, so tests can supply settings without touching
//! the real environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, TodoCastError};

fn default_nats_url() -> String { "nats://my-nats:4222".into() }
fn default_subject() -> String { "todo-backend".into() }
fn default_queue_group() -> String { "broadcasters".into() }
fn default_telegram_api() -> String { "https://api.telegram.org".into() }
fn default_image_path() -> PathBuf { PathBuf::from("/usr/src/app/files/image.jpg") }

/// Typed view over a lookup function.
struct Env<F: Fn(&str) -> Option<String>> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Value of `key`, treating empty strings as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    fn string(&self, key: &str, default: impl Into<String>) -> String {
        self.get(key).unwrap_or_else(|| default.into())
    }

    fn parse<T: FromStr>(&self, key: &str, default: T) -> Result<T>
    where
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|e| {
                TodoCastError::Config(format!("{key}={raw:?} is not valid: {e}"))
            }),
        }
    }
}

fn from_process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Which relational backend holds the `todos` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Sqlite { path: PathBuf },
    Postgres(PostgresConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(from_process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = Env { lookup };
        match env.string("TODO_STORE", "postgres").to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite {
                path: PathBuf::from(env.string("SQLITE_PATH", "todos.db")),
            }),
            "postgres" | "postgresql" => Ok(Self::Postgres(PostgresConfig {
                host: env.string("POSTGRES_HOST", "postgres-svc"),
                port: env.parse("POSTGRES_PORT", 5432)?,
                database: env.string("POSTGRES_DB", "postgres"),
                user: env.string("POSTGRES_USER", "postgres"),
                password: env.get("POSTGRES_PASSWORD").unwrap_or_default(),
            })),
            other => Err(TodoCastError::Config(format!(
                "TODO_STORE must be 'postgres' or 'sqlite', got {other:?}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Notification bus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    pub url: String,
    pub subject: String,
    pub queue_group: String,
    pub connect_timeout: Duration,
}

impl BusConfig {
    /// Publisher side: a slow broker is tolerated for up to a minute.
    pub fn publisher_from_env() -> Result<Self> {
        Self::from_lookup(from_process_env, 60)
    }

    /// Subscriber side: fail fast at startup.
    pub fn subscriber_from_env() -> Result<Self> {
        Self::from_lookup(from_process_env, 5)
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        default_timeout_secs: u64,
    ) -> Result<Self> {
        let env = Env { lookup };
        Ok(Self {
            url: env.string("NATS_URL", default_nats_url()),
            subject: env.string("NATS_SUBJECT", default_subject()),
            queue_group: env.string("NATS_QUEUE_GROUP", default_queue_group()),
            connect_timeout: Duration::from_secs(
                env.parse("NATS_CONNECT_TIMEOUT_SECS", default_timeout_secs)?,
            ),
        })
    }
}

// ---------------------------------------------------------------------------
// Backend service
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub port: u16,
    /// Longest accepted todo text, in characters.
    pub max_todo_length: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { port: 8080, max_todo_length: 140 }
    }
}

impl BackendConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(from_process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = Env { lookup };
        let defaults = Self::default();
        Ok(Self {
            port: env.parse("TODO_BACKEND_PORT", defaults.port)?,
            max_todo_length: env.parse("TODO_MAX_LENGTH", defaults.max_todo_length)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Broadcaster
// ---------------------------------------------------------------------------

/// How the broadcaster delivers received notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcasterMode {
    /// Write to the local log only; never touch the network.
    LogOnly,
    /// POST to the Telegram Bot API.
    Forward(TelegramConfig),
}

#[derive(Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    pub api_url: String,
    pub bot_token: String,
    pub chat_id: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_url", &self.api_url)
            .field("bot_token", &"••••")
            .field("chat_id", &self.chat_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcasterConfig {
    pub mode: BroadcasterMode,
}

impl BroadcasterConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(from_process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = Env { lookup };
        let mode = match env.string("BROADCASTER_MODE", "forward").as_str() {
            "log-only" => BroadcasterMode::LogOnly,
            "forward" => {
                let bot_token = env.get("TELEGRAM_BOT_TOKEN").ok_or_else(|| {
                    TodoCastError::Config("TELEGRAM_BOT_TOKEN is required in forward mode".into())
                })?;
                let chat_id = env.get("TELEGRAM_CHAT_ID").ok_or_else(|| {
                    TodoCastError::Config("TELEGRAM_CHAT_ID is required in forward mode".into())
                })?;
                BroadcasterMode::Forward(TelegramConfig {
                    api_url: env
                        .string("TELEGRAM_API_URL", default_telegram_api())
                        .trim_end_matches('/')
                        .to_string(),
                    bot_token,
                    chat_id,
                    timeout: Duration::from_secs(10),
                })
            }
            other => {
                return Err(TodoCastError::Config(format!(
                    "BROADCASTER_MODE must be 'forward' or 'log-only', got {other:?}"
                )));
            }
        };
        Ok(Self { mode })
    }
}

// ---------------------------------------------------------------------------
// Frontend (image + proxy)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendConfig {
    pub port: u16,
    pub backend_host: String,
    pub backend_port: u16,
    pub image_path: PathBuf,
    pub html_file: PathBuf,
    pub backend_timeout: Duration,
}

impl FrontendConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(from_process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = Env { lookup };
        Ok(Self {
            port: env.parse("IMAGE_READ_PORT", 8081)?,
            backend_host: env.string("BACKEND_HOST", "todo-backend-svc"),
            backend_port: env.parse("BACKEND_PORT", 8080)?,
            image_path: env
                .get("IMAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_image_path),
            html_file: PathBuf::from(env.string("HTML_FILE", "/app/index.html")),
            backend_timeout: Duration::from_secs(2),
        })
    }

    /// Base URL of the todo backend, without trailing slash.
    pub fn backend_url(&self) -> String {
        format!("http://{}:{}", self.backend_host, self.backend_port)
    }
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRefreshConfig {
    pub image_url: String,
    pub write_path: PathBuf,
    pub interval: Duration,
}

impl ImageRefreshConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(from_process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = Env { lookup };
        Ok(Self {
            image_url: env.string("IMAGE_URL", "https://picsum.photos/1200"),
            write_path: env
                .get("IMAGE_WRITE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_image_path),
            interval: Duration::from_secs(env.parse("SLEEP_INTERVAL", 600)?),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderConfig {
    pub wiki_url: String,
}

impl ReminderConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(from_process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = Env { lookup };
        Ok(Self {
            wiki_url: env.string("WIKI_URL", "https://example.com"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_store_defaults_to_postgres() {
        let cfg = StoreConfig::from_lookup(lookup(&[])).unwrap();
        match cfg {
            StoreConfig::Postgres(pg) => {
                assert_eq!(pg.host, "postgres-svc");
                assert_eq!(pg.port, 5432);
                assert_eq!(pg.database, "postgres");
                assert_eq!(pg.user, "postgres");
                assert_eq!(pg.password, "");
            }
            other => panic!("unexpected store config: {other:?}"),
        }
    }

    #[test]
    fn test_store_sqlite() {
        let cfg = StoreConfig::from_lookup(lookup(&[
            ("TODO_STORE", "sqlite"),
            ("SQLITE_PATH", "/tmp/t.db"),
        ]))
        .unwrap();
        assert_eq!(cfg, StoreConfig::Sqlite { path: PathBuf::from("/tmp/t.db") });
    }

    #[test]
    fn test_store_rejects_unknown_backend() {
        let err = StoreConfig::from_lookup(lookup(&[("TODO_STORE", "mongo")])).unwrap_err();
        assert!(matches!(err, TodoCastError::Config(_)));
    }

    #[test]
    fn test_bad_port_is_config_error() {
        let err = BackendConfig::from_lookup(lookup(&[("TODO_BACKEND_PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("TODO_BACKEND_PORT"));
    }

    #[test]
    fn test_backend_defaults() {
        let cfg = BackendConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, BackendConfig { port: 8080, max_todo_length: 140 });
    }

    #[test]
    fn test_bus_defaults() {
        let cfg = BusConfig::from_lookup(lookup(&[]), 60).unwrap();
        assert_eq!(cfg.url, "nats://my-nats:4222");
        assert_eq!(cfg.subject, "todo-backend");
        assert_eq!(cfg.queue_group, "broadcasters");
        assert_eq!(cfg.connect_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_broadcaster_log_only() {
        let cfg = BroadcasterConfig::from_lookup(lookup(&[("BROADCASTER_MODE", "log-only")])).unwrap();
        assert_eq!(cfg.mode, BroadcasterMode::LogOnly);
    }

    #[test]
    fn test_broadcaster_forward_requires_credentials() {
        let err = BroadcasterConfig::from_lookup(lookup(&[("TELEGRAM_CHAT_ID", "42")])).unwrap_err();
        assert!(err.to_string().contains("TELEGRAM_BOT_TOKEN"));

        let err = BroadcasterConfig::from_lookup(lookup(&[("TELEGRAM_BOT_TOKEN", "abc")])).unwrap_err();
        assert!(err.to_string().contains("TELEGRAM_CHAT_ID"));
    }

    #[test]
    fn test_broadcaster_forward() {
        let cfg = BroadcasterConfig::from_lookup(lookup(&[
            ("BROADCASTER_MODE", "forward"),
            ("TELEGRAM_BOT_TOKEN", "abc"),
            ("TELEGRAM_CHAT_ID", "42"),
            ("TELEGRAM_API_URL", "http://localhost:9000/"),
        ]))
        .unwrap();
        let BroadcasterMode::Forward(tg) = cfg.mode else {
            panic!("expected forward mode");
        };
        assert_eq!(tg.api_url, "http://localhost:9000");
        assert_eq!(tg.bot_token, "abc");
        assert_eq!(tg.chat_id, "42");
        assert_eq!(tg.timeout, Duration::from_secs(10));
        assert!(!format!("{tg:?}").contains("abc"));
    }

    #[test]
    fn test_broadcaster_rejects_unknown_mode() {
        let err = BroadcasterConfig::from_lookup(lookup(&[("BROADCASTER_MODE", "shout")])).unwrap_err();
        assert!(matches!(err, TodoCastError::Config(_)));
    }

    #[test]
    fn test_frontend_backend_url() {
        let cfg = FrontendConfig::from_lookup(lookup(&[
            ("BACKEND_HOST", "localhost"),
            ("BACKEND_PORT", "9090"),
        ]))
        .unwrap();
        assert_eq!(cfg.backend_url(), "http://localhost:9090");
        assert_eq!(cfg.port, 8081);
    }

    #[test]
    fn test_image_refresh_interval() {
        let cfg = ImageRefreshConfig::from_lookup(lookup(&[("SLEEP_INTERVAL", "30")])).unwrap();
        assert_eq!(cfg.interval, Duration::from_secs(30));
        assert_eq!(cfg.image_url, "https://picsum.photos/1200");
    }
}
