//! Search orchestration — the two-stage model pipeline behind every job search.
//!
//! Flow: grounded search → citation decoding → summarization → `SearchResult`.
//!
//! Stages are strictly sequential; the summary prompt needs the search output.
//! No retries, no partial results: a run either completes or fails as a whole.

use std::fmt;

use thiserror::Error;
use tracing::{error, info};

use crate::llm_client::{GenerativeModel, LlmError, SEARCH_MODEL, SUMMARY_MODEL};
use crate::search::models::{Progress, SearchResult};
use crate::search::prompts::{build_search_prompt, build_summary_prompt};
use crate::search::sources::sources_from_chunks;

/// Pipeline stage a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Search,
    Summary,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Search => f.write_str("search"),
            Stage::Summary => f.write_str("summary"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(
        "The AI could not find any job descriptions based on the provided resume. \
        This might be due to a very niche resume or a temporary issue with the search. \
        Please try rephrasing your resume or try again later."
    )]
    NoResults,

    #[error("An error occurred while processing your request: {source}")]
    Upstream { stage: Stage, source: LlmError },
}

/// Runs the full search pipeline for one resume.
///
/// Steps:
/// 1. progress(Searching) → grounded search for 3–5 postings
/// 2. blank search text → `NoResults` (summary stage is never called)
/// 3. citations → `Source`s (entries without a URI are dropped)
/// 4. progress(Summarizing) → Markdown summary of resume vs. postings
/// 5. progress(Finalizing) → `SearchResult`
///
/// Blank resume text is rejected by the HTTP layer before this is called.
pub async fn analyze_resume_and_find_jobs<F>(
    llm: &dyn GenerativeModel,
    resume_text: &str,
    mut on_progress: F,
) -> Result<SearchResult, SearchError>
where
    F: FnMut(Progress) + Send,
{
    // Step 1: Grounded search
    on_progress(Progress::Searching);
    info!("Searching for jobs ({} resume chars)", resume_text.len());

    let search = llm
        .generate_grounded(SEARCH_MODEL, &build_search_prompt(resume_text))
        .await
        .map_err(|source| upstream(Stage::Search, source))?;

    // Step 2: Terminal on empty findings
    let job_descriptions = match search.text {
        Some(text) if !text.trim().is_empty() => text,
        _ => {
            error!("Search stage returned no job descriptions");
            return Err(SearchError::NoResults);
        }
    };

    // Step 3: Citations
    let sources = sources_from_chunks(&search.citations);
    info!(
        "Search found {} chars of job text with {} sources",
        job_descriptions.len(),
        sources.len()
    );

    // Step 4: Summarize
    on_progress(Progress::Summarizing);
    let summary = llm
        .generate(
            SUMMARY_MODEL,
            &build_summary_prompt(resume_text, &job_descriptions),
        )
        .await
        .map_err(|source| upstream(Stage::Summary, source))?;

    // Step 5: Finalize
    on_progress(Progress::Finalizing);
    let summary = summary.text.unwrap_or_default();
    info!("Search run complete: {} summary chars", summary.len());

    Ok(SearchResult {
        summary,
        raw_findings: Some(job_descriptions),
        sources,
    })
}

fn upstream(stage: Stage, source: LlmError) -> SearchError {
    error!("Model call failed at {stage} stage: {source}");
    SearchError::Upstream { stage, source }
}
