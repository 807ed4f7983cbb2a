pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::markdown::handlers as markdown_handlers;
use crate::search::handlers as search_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Search API
        .route("/api/v1/jobs/search", post(search_handlers::handle_search))
        .route(
            "/api/v1/jobs/search/stream",
            post(search_handlers::handle_search_stream),
        )
        // Rendering
        .route(
            "/api/v1/markdown/render",
            post(markdown_handlers::handle_render),
        )
        .with_state(state)
}
