/// LLM Client — the single point of entry for all Gemini API calls in Hunter.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All model interactions MUST go through the `GenerativeModel` trait.
///
/// Models are hardcoded per pipeline stage — do not make configurable.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[cfg(test)]
pub mod testing;

/// Model used for the search-grounded extraction stage.
pub const SEARCH_MODEL: &str = "gemini-2.5-flash";
/// Model used for the summarization stage.
pub const SUMMARY_MODEL: &str = "gemini-2.5-pro";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
    #[serde(default)]
    web_search_queries: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

/// A grounding citation as the API reports it. Every field is optional;
/// `search::sources` decides which ones are usable.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GroundingChunk {
    pub web: Option<WebChunk>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WebChunk {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Normalized output of a single generation call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generation {
    /// Concatenated text parts of the first candidate; `None` when there were none.
    pub text: Option<String>,
    pub citations: Vec<GroundingChunk>,
}

impl GenerateContentResponse {
    /// A response without candidates (e.g. a blocked prompt) yields no text, not an error.
    fn into_generation(self) -> Generation {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self.prompt_feedback.and_then(|f| f.block_reason);
            warn!("Model returned no candidates (block reason: {reason:?})");
            return Generation::default();
        };

        let texts: Vec<String> = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        let text = if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        };

        let citations = match candidate.grounding_metadata {
            Some(meta) => {
                if !meta.web_search_queries.is_empty() {
                    debug!("Grounded search queries: {:?}", meta.web_search_queries);
                }
                meta.grounding_chunks
            }
            None => Vec::new(),
        };

        Generation { text, citations }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait seam
// ────────────────────────────────────────────────────────────────────────────

/// The generative model seam. `GeminiClient` is the production backend;
/// tests script their own.
///
/// Carried in `AppState` as `Arc<dyn GenerativeModel>`.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generation with live web search enabled; returns text plus citations.
    async fn generate_grounded(&self, model: &str, prompt: &str) -> Result<Generation, LlmError>;

    /// Plain text generation.
    async fn generate(&self, model: &str, prompt: &str) -> Result<Generation, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// GeminiClient
// ────────────────────────────────────────────────────────────────────────────

/// Gemini `generateContent` REST client. Built once at startup from validated config.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    /// Makes a single call to the API. No retries: failures surface to the caller as-is.
    async fn call(&self, model: &str, prompt: &str, grounded: bool) -> Result<Generation, LlmError> {
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            tools: if grounded {
                vec![Tool {
                    google_search: GoogleSearch {},
                }]
            } else {
                Vec::new()
            },
        };

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini call succeeded: model={}, prompt_tokens={}, output_tokens={}",
                model, usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(parsed.into_generation())
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_grounded(&self, model: &str, prompt: &str) -> Result<Generation, LlmError> {
        self.call(model, prompt, true).await
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<Generation, LlmError> {
        self.call(model, prompt, false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new("test-key".to_string(), server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_into_generation_concatenates_parts() {
        let raw = json!({
            "candidates": [{
                "content": {"parts": [{"text": "Job 1. "}, {"text": "Job 2."}]}
            }]
        });
        let parsed: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let generation = parsed.into_generation();
        assert_eq!(generation.text.as_deref(), Some("Job 1. Job 2."));
        assert!(generation.citations.is_empty());
    }

    #[test]
    fn test_into_generation_without_parts_has_no_text() {
        let raw = json!({"candidates": [{"content": {"parts": []}}]});
        let parsed: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.into_generation().text, None);
    }

    #[test]
    fn test_into_generation_without_candidates_has_no_text() {
        let raw = json!({"candidates": [], "promptFeedback": {"blockReason": "OTHER"}});
        let parsed: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.into_generation(), Generation::default());
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [],
                "promptFeedback": {"blockReason": "OTHER"}
            })))
            .mount(&server)
            .await;

        let generation = client_for(&server)
            .generate_grounded(SEARCH_MODEL, "find jobs")
            .await
            .unwrap();

        assert_eq!(generation.text, None);
        assert!(generation.citations.is_empty());
    }

    #[test]
    fn test_grounding_chunks_decode_with_missing_fields() {
        let raw = json!({
            "candidates": [{
                "content": {"parts": [{"text": "x"}]},
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"uri": "https://a.example", "title": "A"}},
                        {"web": {"uri": "https://b.example"}},
                        {"retrievedContext": {"uri": "ignored"}},
                        {}
                    ]
                }
            }]
        });
        let parsed: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let citations = parsed.into_generation().citations;
        assert_eq!(citations.len(), 4);
        assert_eq!(
            citations[1].web.as_ref().and_then(|w| w.title.clone()),
            None
        );
        assert!(citations[2].web.is_none());
    }

    #[tokio::test]
    async fn test_grounded_call_sends_search_tool_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{"role": "user", "parts": [{"text": "find jobs"}]}],
                "tools": [{"google_search": {}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"parts": [{"text": "Rust Engineer at Acme"}]},
                    "groundingMetadata": {
                        "groundingChunks": [{"web": {"uri": "https://acme.example/jobs/1", "title": "Acme"}}]
                    }
                }],
                "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let generation = client_for(&server)
            .generate_grounded(SEARCH_MODEL, "find jobs")
            .await
            .unwrap();

        assert_eq!(generation.text.as_deref(), Some("Rust Engineer at Acme"));
        assert_eq!(generation.citations.len(), 1);
    }

    #[tokio::test]
    async fn test_plain_call_omits_tools() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-pro:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "## Summary"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let generation = client_for(&server)
            .generate(SUMMARY_MODEL, "summarize")
            .await
            .unwrap();
        assert_eq!(generation.text.as_deref(), Some("## Summary"));

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(body.get("tools").is_none());
        assert_eq!(body["contents"][0]["parts"][0]["text"], "summarize");
    }

    #[tokio::test]
    async fn test_api_error_message_is_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate(SUMMARY_MODEL, "summarize")
            .await
            .unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_api_error_falls_back_to_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate_grounded(SEARCH_MODEL, "find jobs")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("upstream unavailable"));
        assert!(err.to_string().contains("503"));
    }
}
