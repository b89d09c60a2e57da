pub mod todos;

use axum::{routing::get, Router};

/// Wraps the page routes with the liveness probe.
pub fn app(router: Router) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(router)
}
