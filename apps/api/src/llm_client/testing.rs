//! Scripted `GenerativeModel` for unit tests. Records every call it receives.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{Generation, GenerativeModel, GroundingChunk, LlmError, WebChunk};

#[derive(Debug, Clone)]
pub enum Reply {
    Ok(Generation),
    Fail(String),
}

impl Reply {
    pub fn text(text: &str) -> Self {
        Reply::Ok(Generation {
            text: Some(text.to_string()),
            citations: Vec::new(),
        })
    }

    pub fn with_citations(text: &str, citations: Vec<GroundingChunk>) -> Self {
        Reply::Ok(Generation {
            text: Some(text.to_string()),
            citations,
        })
    }

    fn resolve(&self) -> Result<Generation, LlmError> {
        match self {
            Reply::Ok(generation) => Ok(generation.clone()),
            Reply::Fail(message) => Err(LlmError::Api {
                status: 503,
                message: message.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub model: String,
    pub prompt: String,
    pub grounded: bool,
}

pub struct ScriptedModel {
    search: Reply,
    summary: Reply,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedModel {
    pub fn new(search: Reply, summary: Reply) -> Self {
        Self {
            search,
            summary,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, model: &str, prompt: &str, grounded: bool) {
        self.calls.lock().unwrap().push(RecordedCall {
            model: model.to_string(),
            prompt: prompt.to_string(),
            grounded,
        });
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate_grounded(&self, model: &str, prompt: &str) -> Result<Generation, LlmError> {
        self.record(model, prompt, true);
        self.search.resolve()
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<Generation, LlmError> {
        self.record(model, prompt, false);
        self.summary.resolve()
    }
}

pub fn web_chunk(uri: Option<&str>, title: Option<&str>) -> GroundingChunk {
    GroundingChunk {
        web: Some(WebChunk {
            uri: uri.map(str::to_string),
            title: title.map(str::to_string),
        }),
    }
}
