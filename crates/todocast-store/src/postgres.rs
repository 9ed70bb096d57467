//! PostgreSQL Todo Store.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use todocast_core::config::PostgresConfig;
use todocast_core::error::{Result, TodoCastError};
use todocast_core::traits::TodoStore;
use todocast_core::types::TodoItem;

fn store_err(e: sqlx::Error) -> TodoCastError {
    TodoCastError::Store(e.to_string())
}

/// Single-connection pool: the backend keeps one session open for its
/// lifetime and issues one statement at a time, each autocommitted.
pub struct PostgresTodoStore {
    pool: PgPool,
}

impl PostgresTodoStore {
    pub async fn connect(config: &PostgresConfig) -> Result<Self> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .password(&config.password);
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| {
                TodoCastError::Store(format!(
                    "connect to postgres at {}:{}: {e}",
                    config.host, config.port
                ))
            })?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id SERIAL PRIMARY KEY,
                item TEXT,
                done BOOLEAN DEFAULT FALSE
            )",
        )
        .execute(&pool)
        .await
        .map_err(store_err)?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl TodoStore for PostgresTodoStore {
    fn name(&self) -> &str {
        "postgres"
    }

    async fn list(&self) -> Result<Vec<TodoItem>> {
        let rows: Vec<(i32, Option<String>, Option<bool>)> =
            sqlx::query_as("SELECT id, item, done FROM todos")
                .fetch_all(&self.pool)
                .await
                .map_err(store_err)?;
        Ok(rows
            .into_iter()
            .map(|(id, item, done)| TodoItem {
                id: i64::from(id),
                item: item.unwrap_or_default(),
                done: done.unwrap_or(false),
            })
            .collect())
    }

    async fn insert(&self, item: &str) -> Result<i64> {
        let (id,): (i32,) = sqlx::query_as("INSERT INTO todos(item) VALUES ($1) RETURNING id")
            .bind(item)
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(i64::from(id))
    }

    async fn item_text(&self, id: i64) -> Result<Option<String>> {
        // SERIAL keys are int4; nothing outside that range can exist.
        let Ok(id) = i32::try_from(id) else {
            return Ok(None);
        };
        let row: Option<(Option<String>,)> = sqlx::query_as("SELECT item FROM todos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(row.map(|(item,)| item.unwrap_or_default()))
    }

    async fn mark_done(&self, id: i64) -> Result<u64> {
        let Ok(id) = i32::try_from(id) else {
            return Ok(0);
        };
        let result = sqlx::query("UPDATE todos SET done = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(())
    }
}
