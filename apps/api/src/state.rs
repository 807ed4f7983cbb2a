use std::sync::Arc;

use crate::llm_client::GenerativeModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Model backend. `GeminiClient` in production, built once in `main`.
    pub llm: Arc<dyn GenerativeModel>,
}
