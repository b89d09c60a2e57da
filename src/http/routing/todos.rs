use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;
use tera::{Context, Tera};

use crate::application::outcome::{FormAction, Outcome, Page};
use crate::application::todo_service::TodoService;
use crate::domain::todo::TodoId;
use crate::domain::validation::RawTodoInput;
use crate::http::types::AppError;

#[derive(Clone)]
pub struct AppState<S: TodoService> {
    pub service: S,
    pub templates: Arc<Tera>,
}

pub fn router<S: TodoService + Clone>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(home::<S>))
        .route("/create", get(create_form::<S>).post(create::<S>))
        .route("/edit/:id", get(edit_form::<S>).post(edit::<S>))
        .route("/delete/:id", get(delete::<S>).post(delete::<S>))
        .route("/toggle/:id", get(toggle::<S>).post(toggle::<S>))
        .with_state(state)
}

#[derive(Deserialize)]
struct HomeQuery {
    notice: Option<String>,
}

async fn home<S: TodoService>(
    State(state): State<AppState<S>>,
    Query(query): Query<HomeQuery>,
) -> Result<Response, AppError> {
    let outcome = state.service.home().await?;
    respond(&state.templates, outcome, query.notice.as_deref())
}

async fn create_form<S: TodoService>(
    State(state): State<AppState<S>>,
) -> Result<Response, AppError> {
    let outcome = state.service.create_form().await?;
    respond(&state.templates, outcome, None)
}

async fn create<S: TodoService>(
    State(state): State<AppState<S>>,
    Form(input): Form<RawTodoInput>,
) -> Result<Response, AppError> {
    let outcome = state.service.create(input).await?;
    respond(&state.templates, outcome, None)
}

async fn edit_form<S: TodoService>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let outcome = state.service.edit_form(TodoId(id)).await?;
    respond(&state.templates, outcome, None)
}

async fn edit<S: TodoService>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
    Form(input): Form<RawTodoInput>,
) -> Result<Response, AppError> {
    let outcome = state.service.edit(TodoId(id), input).await?;
    respond(&state.templates, outcome, None)
}

async fn delete<S: TodoService>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
    method: Method,
) -> Result<Response, AppError> {
    let outcome = state.service.delete(TodoId(id), method == Method::POST).await?;
    respond(&state.templates, outcome, None)
}

async fn toggle<S: TodoService>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
    method: Method,
) -> Result<Response, AppError> {
    let outcome = state.service.toggle(TodoId(id), method == Method::POST).await?;
    respond(&state.templates, outcome, None)
}

fn respond(templates: &Tera, outcome: Outcome, notice: Option<&str>) -> Result<Response, AppError> {
    match outcome {
        Outcome::Render(page) => render(templates, &page, notice),
        Outcome::Redirect { to, notice } => redirect(&to, notice.as_deref()),
        Outcome::NotFound => Err(AppError::NotFound),
    }
}

fn render(templates: &Tera, page: &Page, notice: Option<&str>) -> Result<Response, AppError> {
    let (name, mut ctx) = match page {
        Page::Home { todos } => {
            let mut ctx = Context::new();
            ctx.insert("todos", todos);
            ("home.html", ctx)
        }
        Page::Form { action, todo_id, values, errors } => {
            let mut ctx = Context::new();
            ctx.insert("action", action.label());
            let submit_path = match (action, todo_id) {
                (FormAction::Edit, Some(id)) => format!("/edit/{id}"),
                _ => "/create".to_string(),
            };
            ctx.insert("submit_path", &submit_path);
            ctx.insert("values", values);
            ctx.insert("errors", errors);
            ("todo_form.html", ctx)
        }
    };
    if let Some(notice) = notice {
        ctx.insert("notice", notice);
    }
    Ok(Html(templates.render(name, &ctx)?).into_response())
}

// 302 Found, with the flash notice carried as a query parameter the home
// page echoes once.
fn redirect(to: &str, notice: Option<&str>) -> Result<Response, AppError> {
    let location = match notice {
        Some(msg) => {
            let query =
                serde_urlencoded::to_string([("notice", msg)].as_slice()).map_err(anyhow::Error::from)?;
            format!("{to}?{query}")
        }
        None => to.to_string(),
    };
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
