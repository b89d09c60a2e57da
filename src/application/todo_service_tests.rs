#[cfg(test)]
mod tests {
    use super::super::outcome::{FormAction, Outcome, Page};
    use super::super::todo_service::{TodoService, TodoServiceImpl};
    use crate::domain::{
        repository::TodoRepository,
        todo::{Todo, TodoDraft, TodoId},
        validation::RawTodoInput,
    };
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct InMemoryRepo {
        inner: Arc<Mutex<(i64, BTreeMap<i64, Todo>)>>,
    }

    #[async_trait]
    impl TodoRepository for InMemoryRepo {
        async fn init(&self) -> Result<()> { Ok(()) }
        async fn create(&self, draft: TodoDraft) -> Result<Todo> {
            let now = Utc::now();
            let mut inner = self.inner.lock().unwrap();
            inner.0 += 1;
            let todo = Todo {
                id: TodoId(inner.0),
                title: draft.title,
                description: draft.description,
                due_date: draft.due_date,
                is_resolved: draft.is_resolved,
                created_at: now,
                updated_at: now,
            };
            inner.1.insert(todo.id.0, todo.clone());
            Ok(todo)
        }
        async fn get(&self, id: TodoId) -> Result<Option<Todo>> {
            Ok(self.inner.lock().unwrap().1.get(&id.0).cloned())
        }
        async fn list(&self) -> Result<Vec<Todo>> {
            Ok(self.inner.lock().unwrap().1.values().cloned().collect())
        }
        async fn update(&self, id: TodoId, draft: TodoDraft) -> Result<Option<Todo>> {
            let mut inner = self.inner.lock().unwrap();
            let Some(todo) = inner.1.get_mut(&id.0) else { return Ok(None) };
            todo.title = draft.title;
            todo.description = draft.description;
            todo.due_date = draft.due_date;
            todo.is_resolved = draft.is_resolved;
            todo.updated_at = Utc::now();
            Ok(Some(todo.clone()))
        }
        async fn delete(&self, id: TodoId) -> Result<bool> {
            Ok(self.inner.lock().unwrap().1.remove(&id.0).is_some())
        }
    }

    fn service() -> (InMemoryRepo, TodoServiceImpl<InMemoryRepo>) {
        let repo = InMemoryRepo::default();
        (repo.clone(), TodoServiceImpl::new(repo))
    }

    fn raw(title: &str) -> RawTodoInput {
        RawTodoInput { title: Some(title.into()), ..Default::default() }
    }

    fn expect_redirect(outcome: Outcome) -> (String, Option<String>) {
        match outcome {
            Outcome::Redirect { to, notice } => (to, notice),
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_applies_defaults() {
        let (repo, service) = service();
        let (to, notice) = expect_redirect(service.create(raw("Buy milk")).await.unwrap());
        assert_eq!(to, "/");
        assert_eq!(notice.as_deref(), Some("TODO created successfully!"));

        let todos = repo.list().await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].title, "Buy milk");
        assert_eq!(todos[0].description, "");
        assert_eq!(todos[0].due_date, None);
        assert!(!todos[0].is_resolved);
    }

    #[tokio::test]
    async fn create_with_empty_title_persists_nothing() {
        let (repo, service) = service();
        let outcome = service.create(raw("   ")).await.unwrap();
        match outcome {
            Outcome::Render(Page::Form { action, errors, values, .. }) => {
                assert_eq!(action, FormAction::Create);
                assert!(errors.get("title").is_some());
                assert_eq!(values.title, "   ");
            }
            other => panic!("expected form re-display, got {other:?}"),
        }
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn home_lists_all_todos() {
        let (_, service) = service();
        service.create(raw("First")).await.unwrap();
        service.create(raw("Second")).await.unwrap();
        match service.home().await.unwrap() {
            Outcome::Render(Page::Home { todos }) => {
                assert_eq!(todos.len(), 2);
                assert_eq!(todos[0].title, "First");
                assert_eq!(todos[1].title, "Second");
            }
            other => panic!("expected home page, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn edit_preserves_identity_and_refreshes_updated_at() {
        let (repo, service) = service();
        let input = RawTodoInput {
            due_date: Some("2025-01-01".into()),
            ..raw("A")
        };
        service.create(input).await.unwrap();
        let before = repo.get(TodoId(1)).await.unwrap().unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let edit = RawTodoInput {
            is_resolved: Some("on".into()),
            ..raw("B")
        };
        let (_, notice) = expect_redirect(service.edit(TodoId(1), edit).await.unwrap());
        assert_eq!(notice.as_deref(), Some("TODO updated successfully!"));

        let after = repo.get(TodoId(1)).await.unwrap().unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.title, "B");
        assert_eq!(after.due_date, before.due_date, "omitted due_date stays unchanged");
        assert!(after.is_resolved);
    }

    #[tokio::test]
    async fn edit_with_invalid_title_keeps_record_and_redisplays() {
        let (repo, service) = service();
        service.create(raw("Keep me")).await.unwrap();
        let outcome = service.edit(TodoId(1), raw("")).await.unwrap();
        match outcome {
            Outcome::Render(Page::Form { action, todo_id, errors, .. }) => {
                assert_eq!(action, FormAction::Edit);
                assert_eq!(todo_id, Some(TodoId(1)));
                assert!(errors.get("title").is_some());
            }
            other => panic!("expected form re-display, got {other:?}"),
        }
        assert_eq!(repo.get(TodoId(1)).await.unwrap().unwrap().title, "Keep me");
    }

    #[tokio::test]
    async fn edit_form_prefills_values() {
        let (_, service) = service();
        let input = RawTodoInput {
            description: Some("notes".into()),
            due_date: Some("2025-03-04".into()),
            ..raw("Prefilled")
        };
        service.create(input).await.unwrap();
        match service.edit_form(TodoId(1)).await.unwrap() {
            Outcome::Render(Page::Form { values, errors, .. }) => {
                assert_eq!(values.title, "Prefilled");
                assert_eq!(values.description, "notes");
                assert_eq!(values.due_date, "2025-03-04");
                assert!(errors.is_empty());
            }
            other => panic!("expected form, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn toggle_round_trips() {
        let (repo, service) = service();
        service.create(raw("Flip me")).await.unwrap();

        let (_, notice) = expect_redirect(service.toggle(TodoId(1), true).await.unwrap());
        assert_eq!(notice.as_deref(), Some("TODO marked as resolved!"));
        assert!(repo.get(TodoId(1)).await.unwrap().unwrap().is_resolved);

        let (_, notice) = expect_redirect(service.toggle(TodoId(1), true).await.unwrap());
        assert_eq!(notice.as_deref(), Some("TODO marked as unresolved!"));
        assert!(!repo.get(TodoId(1)).await.unwrap().unwrap().is_resolved);
    }

    #[tokio::test]
    async fn toggle_without_submission_is_a_noop_redirect() {
        let (repo, service) = service();
        service.create(raw("Untouched")).await.unwrap();
        let (_, notice) = expect_redirect(service.toggle(TodoId(1), false).await.unwrap());
        assert_eq!(notice, None);
        assert!(!repo.get(TodoId(1)).await.unwrap().unwrap().is_resolved);
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let (repo, service) = service();
        service.create(raw("Doomed")).await.unwrap();
        let (_, notice) = expect_redirect(service.delete(TodoId(1), true).await.unwrap());
        assert_eq!(notice.as_deref(), Some("TODO deleted successfully!"));
        assert_eq!(repo.get(TodoId(1)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_without_submission_is_a_noop_redirect() {
        let (repo, service) = service();
        service.create(raw("Survivor")).await.unwrap();
        let (_, notice) = expect_redirect(service.delete(TodoId(1), false).await.unwrap());
        assert_eq!(notice, None);
        assert!(repo.get(TodoId(1)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unknown_id_is_not_found_everywhere() {
        let (_, service) = service();
        let id = TodoId(9999);
        assert_eq!(service.edit_form(id).await.unwrap(), Outcome::NotFound);
        assert_eq!(service.edit(id, raw("X")).await.unwrap(), Outcome::NotFound);
        assert_eq!(service.delete(id, true).await.unwrap(), Outcome::NotFound);
        assert_eq!(service.delete(id, false).await.unwrap(), Outcome::NotFound);
        assert_eq!(service.toggle(id, true).await.unwrap(), Outcome::NotFound);
        assert_eq!(service.toggle(id, false).await.unwrap(), Outcome::NotFound);
    }
}
