//! Axum route handlers for the Search API.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use chrono::{DateTime, Utc};
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::markdown;
use crate::search::models::{SearchResult, Source};
use crate::search::orchestrator::analyze_resume_and_find_jobs;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub summary: String,
    pub summary_html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_findings: Option<String>,
    pub sources: Vec<Source>,
    pub progress: Vec<String>,
}

impl SearchResponse {
    fn new(run_id: Uuid, result: SearchResult, progress: Vec<String>) -> Self {
        Self {
            run_id,
            generated_at: Utc::now(),
            summary_html: markdown::render(&result.summary),
            summary: result.summary,
            raw_findings: result.raw_findings,
            sources: result.sources,
            progress,
        }
    }
}

fn validate_resume(resume_text: &str) -> Result<(), AppError> {
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Please paste your resume before searching.".to_string(),
        ));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/search
///
/// Runs the full pipeline and returns the summary (Markdown and HTML), the raw
/// findings, cited sources and the progress messages seen along the way.
pub async fn handle_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    validate_resume(&request.resume_text)?;

    let run_id = Uuid::new_v4();
    let mut progress = Vec::new();

    let result = analyze_resume_and_find_jobs(state.llm.as_ref(), &request.resume_text, |p| {
        progress.push(p.message().to_string())
    })
    .instrument(info_span!("search_run", %run_id))
    .await?;

    Ok(Json(SearchResponse::new(run_id, result, progress)))
}

/// POST /api/v1/jobs/search/stream
///
/// Same pipeline, delivered as Server-Sent Events: one `progress` event per
/// checkpoint, then a single `result` or `error` event. The run is not
/// cancelled if the client goes away.
pub async fn handle_search_stream(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    validate_resume(&request.resume_text)?;

    let run_id = Uuid::new_v4();
    let llm = Arc::clone(&state.llm);
    let (tx, rx) = mpsc::unbounded_channel::<Event>();

    tokio::spawn(async move {
        let progress_tx = tx.clone();
        let mut progress = Vec::new();

        let outcome = analyze_resume_and_find_jobs(llm.as_ref(), &request.resume_text, |p| {
            progress.push(p.message().to_string());
            let _ = progress_tx.send(Event::default().event("progress").data(p.message()));
        })
        .instrument(info_span!("search_run", %run_id))
        .await;

        let terminal = match outcome {
            Ok(result) => json_event("result", &SearchResponse::new(run_id, result, progress)),
            Err(err) => {
                let err = AppError::from(err);
                warn!("Streamed search {run_id} failed: {err}");
                json_event("error", &err.body())
            }
        };

        if tx.send(terminal).is_err() {
            warn!("Client disconnected before search {run_id} finished");
        }
    });

    let events = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|event| (Ok::<_, Infallible>(event), rx))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

fn json_event<T: Serialize>(name: &str, payload: &T) -> Event {
    Event::default()
        .event(name)
        .json_data(payload)
        .unwrap_or_else(|e| {
            Event::default()
                .event("error")
                .data(format!("Failed to encode {name} event: {e}"))
        })
}
