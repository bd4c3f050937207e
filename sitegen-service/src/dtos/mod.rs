use serde::{Deserialize, Serialize};

/// Body of `POST /generate`. Either field may carry the topic.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl GenerateRequest {
    /// First non-blank of `topic` and `prompt`, trimmed.
    pub fn topic(&self) -> Option<&str> {
        [self.topic.as_deref(), self.prompt.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

/// A generated website as returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSite {
    pub html: String,
    #[serde(default)]
    pub css: String,
    #[serde(default)]
    pub js: String,
}
