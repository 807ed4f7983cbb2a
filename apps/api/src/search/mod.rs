// Resume → job search pipeline.
// Implements: grounded job search, citation decoding, summarization, HTTP handlers.
// All model calls go through llm_client — no direct Gemini calls here.

pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod sources;
