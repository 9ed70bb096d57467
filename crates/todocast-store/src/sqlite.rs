//! SQLite Todo Store.

use async_trait::async_trait;
use rusqlite::{Connection, params};
use std::path::Path;
use std::sync::Mutex;
use todocast_core::error::{Result, TodoCastError};
use todocast_core::traits::TodoStore;
use todocast_core::types::TodoItem;

fn store_err(e: impl std::fmt::Display) -> TodoCastError {
    TodoCastError::Store(e.to_string())
}

/// One connection, held for the life of the process. Statements run one
/// at a time under the mutex.
pub struct SqliteTodoStore {
    conn: Mutex<Connection>,
}

impl SqliteTodoStore {
    /// Open or create the database at `path` (`:memory:` for a private,
    /// throwaway store).
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| store_err(format!("open {}: {e}", path.display())))?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                item TEXT,
                done BOOLEAN DEFAULT FALSE
            );",
        )
        .map_err(store_err)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(Path::new(":memory:"))
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| store_err(format!("lock: {e}")))
    }
}

#[async_trait]
impl TodoStore for SqliteTodoStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn list(&self) -> Result<Vec<TodoItem>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, item, done FROM todos").map_err(store_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(TodoItem {
                    id: row.get(0)?,
                    item: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    done: row.get::<_, Option<bool>>(2)?.unwrap_or(false),
                })
            })
            .map_err(store_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(store_err)
    }

    async fn insert(&self, item: &str) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute("INSERT INTO todos(item) VALUES (?1)", params![item])
            .map_err(store_err)?;
        Ok(conn.last_insert_rowid())
    }

    async fn item_text(&self, id: i64) -> Result<Option<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT item FROM todos WHERE id = ?1").map_err(store_err)?;
        let mut rows = stmt.query(params![id]).map_err(store_err)?;
        match rows.next().map_err(store_err)? {
            Some(row) => Ok(Some(row.get::<_, Option<String>>(0).map_err(store_err)?.unwrap_or_default())),
            None => Ok(None),
        }
    }

    async fn mark_done(&self, id: i64) -> Result<u64> {
        let conn = self.conn()?;
        let changed = conn
            .execute("UPDATE todos SET done = TRUE WHERE id = ?1", params![id])
            .map_err(store_err)?;
        Ok(changed as u64)
    }

    async fn ping(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.query_row("SELECT 1", [], |r| r.get::<_, i64>(0)).map_err(store_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_list_in_storage_order() {
        let store = SqliteTodoStore::in_memory().unwrap();
        let first = store.insert("Buy milk").await.unwrap();
        let second = store.insert("Walk the dog").await.unwrap();
        assert!(second > first);

        let todos = store.list().await.unwrap();
        assert_eq!(
            todos,
            vec![
                TodoItem { id: first, item: "Buy milk".into(), done: false },
                TodoItem { id: second, item: "Walk the dog".into(), done: false },
            ]
        );
    }

    #[tokio::test]
    async fn test_mark_done() {
        let store = SqliteTodoStore::in_memory().unwrap();
        let id = store.insert("Buy milk").await.unwrap();
        assert_eq!(store.mark_done(id).await.unwrap(), 1);
        assert!(store.list().await.unwrap()[0].done);
        // Already done still matches the row.
        assert_eq!(store.mark_done(id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_mark_done_unknown_id() {
        let store = SqliteTodoStore::in_memory().unwrap();
        assert_eq!(store.mark_done(99).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_item_text() {
        let store = SqliteTodoStore::in_memory().unwrap();
        let id = store.insert("Buy milk").await.unwrap();
        assert_eq!(store.item_text(id).await.unwrap().as_deref(), Some("Buy milk"));
        assert_eq!(store.item_text(id + 1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reopen_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.db");
        {
            let store = SqliteTodoStore::open(&path).unwrap();
            store.insert("persisted").await.unwrap();
        }
        let store = SqliteTodoStore::open(&path).unwrap();
        let todos = store.list().await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].item, "persisted");
    }

    #[tokio::test]
    async fn test_ping() {
        let store = SqliteTodoStore::in_memory().unwrap();
        assert!(store.ping().await.is_ok());
    }
}
