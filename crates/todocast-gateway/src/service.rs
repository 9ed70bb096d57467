//! Backend service: todo operations plus publish-on-mutation.

use std::sync::Arc;
use todocast_core::error::{Result, TodoCastError};
use todocast_core::traits::TodoStore;
use todocast_core::types::{TodoEvent, TodoItem};

use crate::events::EventQueue;

/// Owns the store handle and the event queue; the only writer of the
/// `todos` table.
///
/// Store write and publish are not atomic: the write is committed first,
/// then one event is queued. The publish attempt happens after the
/// caller has its answer, and a failed publish is logged and dropped.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
    events: EventQueue,
    max_todo_length: usize,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>, events: EventQueue, max_todo_length: usize) -> Self {
        Self {
            store,
            events,
            max_todo_length,
        }
    }

    /// All todos in storage order.
    pub async fn list(&self) -> Result<Vec<TodoItem>> {
        self.store.list().await
    }

    /// Store `text` as a new todo, then announce it.
    pub async fn create(&self, text: &str) -> Result<i64> {
        let len = text.chars().count();
        if len > self.max_todo_length {
            return Err(TodoCastError::TooLong {
                len,
                max: self.max_todo_length,
            });
        }

        let id = self.store.insert(text).await?;
        tracing::info!(id, "Todo created");
        self.events.push(TodoEvent::Created(text.to_string()));
        Ok(id)
    }

    /// Mark the todo identified by `raw_id` as done, then announce it.
    ///
    /// The item text is read in its own statement before the update, so a
    /// concurrent change between the two is not seen. Completing an
    /// already-done todo succeeds again and announces again.
    pub async fn complete(&self, raw_id: &str) -> Result<i64> {
        let id: i64 = raw_id
            .trim()
            .parse()
            .map_err(|_| TodoCastError::InvalidId(raw_id.to_string()))?;

        let text = self.store.item_text(id).await?;
        if self.store.mark_done(id).await? == 0 {
            return Err(TodoCastError::NotFound(id));
        }
        tracing::info!(id, "Todo completed");

        if let Some(text) = text {
            self.events.push(TodoEvent::Completed(text));
        }
        Ok(id)
    }

    pub async fn health(&self) -> Result<()> {
        self.store.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{BrokenStore, FailingPublisher, RecordingPublisher};
    use todocast_core::traits::NotificationPublisher;
    use todocast_store::SqliteTodoStore;
    use tokio::task::JoinHandle;

    fn service_with(
        publisher: Arc<dyn NotificationPublisher>,
    ) -> (TodoService, Arc<SqliteTodoStore>, JoinHandle<()>) {
        let store = Arc::new(SqliteTodoStore::in_memory().unwrap());
        let (events, worker) = EventQueue::spawn(publisher);
        (TodoService::new(store.clone(), events, 140), store, worker)
    }

    /// Close the queue and wait until every queued event was attempted.
    async fn drain(service: TodoService, worker: JoinHandle<()>) {
        drop(service);
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_create_stores_exact_text_and_publishes() {
        let publisher = RecordingPublisher::new();
        let (service, store, worker) = service_with(publisher.clone());

        let id = service.create("Buy milk").await.unwrap();
        let todos = store.list().await.unwrap();
        assert_eq!(todos, vec![TodoItem { id, item: "Buy milk".into(), done: false }]);

        drain(service, worker).await;
        assert_eq!(publisher.published(), vec!["New todo created: Buy milk"]);
    }

    #[tokio::test]
    async fn test_create_at_limit_is_accepted() {
        let (service, store, _worker) = service_with(RecordingPublisher::new());
        let text = "é".repeat(140);
        service.create(&text).await.unwrap();
        assert_eq!(store.list().await.unwrap()[0].item, text);
    }

    #[tokio::test]
    async fn test_create_too_long_leaves_store_unchanged() {
        let publisher = RecordingPublisher::new();
        let (service, store, worker) = service_with(publisher.clone());
        service.create("keep me").await.unwrap();

        let err = service.create(&"x".repeat(141)).await.unwrap_err();
        assert!(matches!(err, TodoCastError::TooLong { len: 141, max: 140 }));
        assert_eq!(store.list().await.unwrap().len(), 1);

        drain(service, worker).await;
        assert_eq!(publisher.published(), vec!["New todo created: keep me"]);
    }

    #[tokio::test]
    async fn test_publish_failure_does_not_fail_create() {
        let publisher = Arc::new(FailingPublisher::default());
        let (service, store, worker) = service_with(publisher.clone());

        service.create("Buy milk").await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);

        drain(service, worker).await;
        assert_eq!(publisher.attempts(), 1);
    }

    #[tokio::test]
    async fn test_complete_marks_done_and_publishes() {
        let publisher = RecordingPublisher::new();
        let (service, store, worker) = service_with(publisher.clone());
        let id = service.create("Buy milk").await.unwrap();

        service.complete(&id.to_string()).await.unwrap();
        assert!(store.list().await.unwrap()[0].done);

        drain(service, worker).await;
        assert_eq!(
            publisher.published(),
            vec!["New todo created: Buy milk", "Todo completed: Buy milk"]
        );
    }

    #[tokio::test]
    async fn test_complete_twice_succeeds_and_publishes_twice() {
        let publisher = RecordingPublisher::new();
        let (service, _store, worker) = service_with(publisher.clone());
        let id = service.create("Buy milk").await.unwrap();

        service.complete(&id.to_string()).await.unwrap();
        service.complete(&id.to_string()).await.unwrap();

        drain(service, worker).await;
        assert_eq!(publisher.published().len(), 3);
    }

    #[tokio::test]
    async fn test_complete_unknown_id() {
        let publisher = RecordingPublisher::new();
        let (service, _store, worker) = service_with(publisher.clone());
        let err = service.complete("42").await.unwrap_err();
        assert!(matches!(err, TodoCastError::NotFound(42)));

        drain(service, worker).await;
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn test_complete_malformed_id() {
        let (service, _store, _worker) = service_with(RecordingPublisher::new());
        for raw in ["abc", "1.5", "", "12abc"] {
            let err = service.complete(raw).await.unwrap_err();
            assert!(err.is_validation(), "{raw:?} gave {err:?}");
        }
    }

    #[tokio::test]
    async fn test_publish_failure_does_not_fail_complete() {
        let publisher = Arc::new(FailingPublisher::default());
        let (service, store, worker) = service_with(publisher.clone());
        let id = service.create("Buy milk").await.unwrap();

        service.complete(&id.to_string()).await.unwrap();
        assert!(store.list().await.unwrap()[0].done);

        drain(service, worker).await;
        assert_eq!(publisher.attempts(), 2);
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_and_skips_publish() {
        let publisher = RecordingPublisher::new();
        let (events, worker) = EventQueue::spawn(publisher.clone());
        let service = TodoService::new(Arc::new(BrokenStore), events, 140);

        assert!(matches!(service.create("x").await, Err(TodoCastError::Store(_))));
        assert!(matches!(service.complete("1").await, Err(TodoCastError::Store(_))));
        assert!(service.health().await.is_err());

        drain(service, worker).await;
        assert!(publisher.published().is_empty());
    }
}
