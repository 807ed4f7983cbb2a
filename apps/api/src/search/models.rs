use std::fmt;

use serde::{Deserialize, Serialize};

/// A web page the model cited while searching. `uri` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub uri: String,
    /// Falls back to `uri` when the citation carries no title.
    pub title: String,
}

/// Output of one orchestration run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Markdown produced by the summarization stage.
    pub summary: String,
    /// Job text returned by the grounded search stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_findings: Option<String>,
    pub sources: Vec<Source>,
}

/// Coarse progress checkpoints, reported in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Progress {
    Searching,
    Summarizing,
    Finalizing,
}

impl Progress {
    pub fn message(self) -> &'static str {
        match self {
            Progress::Searching => "Analyzing your resume and searching for relevant jobs...",
            Progress::Summarizing => "Found jobs! Summarizing the key details for you...",
            Progress::Finalizing => "Finalizing your personalized report...",
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
