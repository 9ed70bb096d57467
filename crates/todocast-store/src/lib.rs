//! # TodoCast Store
//! Todo Store backends. Both create the `todos` table on open if it does
//! not exist yet; there are no migrations.

pub mod postgres;
pub mod sqlite;

pub use postgres::PostgresTodoStore;
pub use sqlite::SqliteTodoStore;

use std::sync::Arc;
use todocast_core::config::StoreConfig;
use todocast_core::error::Result;
use todocast_core::traits::TodoStore;

/// Open the store selected by `config`.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn TodoStore>> {
    let store: Arc<dyn TodoStore> = match config {
        StoreConfig::Sqlite { path } => Arc::new(SqliteTodoStore::open(path)?),
        StoreConfig::Postgres(pg) => Arc::new(PostgresTodoStore::connect(pg).await?),
    };
    tracing::info!("Connected to {} store", store.name());
    Ok(store)
}
