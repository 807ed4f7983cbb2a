//! Citation decoding — turns raw grounding chunks into typed `Source`s.

use tracing::debug;

use crate::llm_client::GroundingChunk;
use crate::search::models::Source;

/// Decodes one citation. Returns `None` when there is no usable web URI.
pub fn source_from_chunk(chunk: &GroundingChunk) -> Option<Source> {
    let web = chunk.web.as_ref()?;
    let uri = web.uri.as_deref().map(str::trim).filter(|u| !u.is_empty())?;

    let title = web
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(uri);

    Some(Source {
        uri: uri.to_string(),
        title: title.to_string(),
    })
}

/// Decodes every usable citation, preserving order and duplicates.
pub fn sources_from_chunks(chunks: &[GroundingChunk]) -> Vec<Source> {
    let sources: Vec<Source> = chunks.iter().filter_map(source_from_chunk).collect();

    let dropped = chunks.len() - sources.len();
    if dropped > 0 {
        debug!("Dropped {dropped} of {} citations without a web URI", chunks.len());
    }

    sources
}
