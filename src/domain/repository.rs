use async_trait::async_trait;
use super::todo::{Todo, TodoDraft, TodoId};

/// Narrow persistence interface. `list` is ordered by id ascending (insertion
/// order) and stable across calls; `update` preserves `created_at` and
/// refreshes `updated_at`; every operation is atomic per record.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()>;
    async fn create(&self, draft: TodoDraft) -> anyhow::Result<Todo>;
    async fn get(&self, id: TodoId) -> anyhow::Result<Option<Todo>>;
    async fn list(&self) -> anyhow::Result<Vec<Todo>>;
    async fn update(&self, id: TodoId, draft: TodoDraft) -> anyhow::Result<Option<Todo>>;
    async fn delete(&self, id: TodoId) -> anyhow::Result<bool>;
}
