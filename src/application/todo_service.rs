use crate::application::outcome::{FormAction, FormValues, Outcome, Page};
use crate::domain::repository::TodoRepository;
use crate::domain::todo::TodoId;
use crate::domain::validation::{validate, FieldErrors, RawTodoInput};
use anyhow::Result;
use async_trait::async_trait;

/// One method per request-handling operation. Each returns an [`Outcome`];
/// `Err` is reserved for infrastructure failure.
///
/// `submitted` on `delete`/`toggle` distinguishes a form submission from a
/// plain navigation: an unknown id is a NotFound either way, but only a
/// submission mutates anything.
#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn home(&self) -> Result<Outcome>;
    async fn create_form(&self) -> Result<Outcome>;
    async fn create(&self, input: RawTodoInput) -> Result<Outcome>;
    async fn edit_form(&self, id: TodoId) -> Result<Outcome>;
    async fn edit(&self, id: TodoId, input: RawTodoInput) -> Result<Outcome>;
    async fn delete(&self, id: TodoId, submitted: bool) -> Result<Outcome>;
    async fn toggle(&self, id: TodoId, submitted: bool) -> Result<Outcome>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }
}

#[async_trait]
impl<R: TodoRepository> TodoService for TodoServiceImpl<R> {
    async fn home(&self) -> Result<Outcome> {
        let todos = self.repo.list().await?;
        Ok(Outcome::Render(Page::Home { todos }))
    }

    async fn create_form(&self) -> Result<Outcome> {
        Ok(Outcome::Render(Page::Form {
            action: FormAction::Create,
            todo_id: None,
            values: FormValues::default(),
            errors: FieldErrors::new(),
        }))
    }

    async fn create(&self, input: RawTodoInput) -> Result<Outcome> {
        match validate(&input, None) {
            Ok(draft) => {
                let todo = self.repo.create(draft).await?;
                tracing::info!(id = %todo.id, "todo created");
                Ok(Outcome::redirect_home(Some("TODO created successfully!")))
            }
            Err(errors) => Ok(Outcome::Render(Page::Form {
                action: FormAction::Create,
                todo_id: None,
                values: FormValues::from_input(&input),
                errors,
            })),
        }
    }

    async fn edit_form(&self, id: TodoId) -> Result<Outcome> {
        let Some(todo) = self.repo.get(id).await? else {
            return Ok(Outcome::NotFound);
        };
        Ok(Outcome::Render(Page::Form {
            action: FormAction::Edit,
            todo_id: Some(id),
            values: FormValues::from_todo(&todo),
            errors: FieldErrors::new(),
        }))
    }

    async fn edit(&self, id: TodoId, input: RawTodoInput) -> Result<Outcome> {
        let Some(existing) = self.repo.get(id).await? else {
            return Ok(Outcome::NotFound);
        };
        match validate(&input, Some(&existing)) {
            Ok(draft) => match self.repo.update(id, draft).await? {
                Some(todo) => {
                    tracing::info!(id = %todo.id, "todo updated");
                    Ok(Outcome::redirect_home(Some("TODO updated successfully!")))
                }
                None => Ok(Outcome::NotFound),
            },
            Err(errors) => Ok(Outcome::Render(Page::Form {
                action: FormAction::Edit,
                todo_id: Some(id),
                values: FormValues::from_input(&input),
                errors,
            })),
        }
    }

    async fn delete(&self, id: TodoId, submitted: bool) -> Result<Outcome> {
        if !submitted {
            // Resolve the id for the 404 contract, but mutate nothing.
            return Ok(match self.repo.get(id).await? {
                Some(_) => Outcome::redirect_home(None),
                None => Outcome::NotFound,
            });
        }
        if self.repo.delete(id).await? {
            tracing::info!(%id, "todo deleted");
            Ok(Outcome::redirect_home(Some("TODO deleted successfully!")))
        } else {
            Ok(Outcome::NotFound)
        }
    }

    async fn toggle(&self, id: TodoId, submitted: bool) -> Result<Outcome> {
        let Some(todo) = self.repo.get(id).await? else {
            return Ok(Outcome::NotFound);
        };
        if !submitted {
            return Ok(Outcome::redirect_home(None));
        }
        let mut draft = todo.draft();
        draft.is_resolved = !draft.is_resolved;
        match self.repo.update(id, draft).await? {
            Some(updated) => {
                let state = if updated.is_resolved { "resolved" } else { "unresolved" };
                tracing::info!(id = %updated.id, state, "todo toggled");
                Ok(Outcome::redirect_home(Some(&format!("TODO marked as {state}!"))))
            }
            None => Ok(Outcome::NotFound),
        }
    }
}
