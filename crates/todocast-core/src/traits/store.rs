//! Todo Store trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::TodoItem;

/// Relational store holding the `todos` table.
///
/// Every statement autocommits; there are no transaction boundaries
/// spanning more than one call.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Backend name (e.g. "sqlite", "postgres").
    fn name(&self) -> &str;

    /// All rows in storage order.
    async fn list(&self) -> Result<Vec<TodoItem>>;

    /// Insert a new, not-done item. Returns the assigned id.
    async fn insert(&self, item: &str) -> Result<i64>;

    /// Text of the item with `id`, if such a row exists.
    async fn item_text(&self, id: i64) -> Result<Option<String>>;

    /// Set `done = true` on `id`. Returns the number of rows affected.
    async fn mark_done(&self, id: i64) -> Result<u64>;

    /// Trivial round-trip query used by health checks.
    async fn ping(&self) -> Result<()>;
}
