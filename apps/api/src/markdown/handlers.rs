//! Axum route handler for ad-hoc Markdown rendering.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::markdown::render;

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub markdown: String,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub html: String,
}

/// POST /api/v1/markdown/render
pub async fn handle_render(Json(request): Json<RenderRequest>) -> Json<RenderResponse> {
    Json(RenderResponse {
        html: render(&request.markdown),
    })
}
