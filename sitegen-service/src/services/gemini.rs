//! Gemini `generateContent` wire format.
//!
//! Only the pieces the generator needs: the request body, the URL, and the
//! path to the first candidate's text in the response envelope.

use super::error::GenerationError;
use serde::{Deserialize, Serialize};

/// Gemini API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const GENERATE_METHOD: &str = "generateContent";

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

const SAFETY_THRESHOLD: &str = "BLOCK_ONLY_HIGH";

/// Build the `generateContent` URL for `model`.
pub fn api_url(base: &str, model: &str, api_key: &str) -> String {
    format!(
        "{}/models/{}:{}?key={}",
        base.trim_end_matches('/'),
        model,
        GENERATE_METHOD,
        api_key
    )
}

/// Recover the model id from a URL built by [`api_url`].
pub fn model_from_url(url: &str) -> Option<&str> {
    let rest = &url[url.find("/models/")? + "/models/".len()..];
    let end = rest.find(':')?;
    Some(&rest[..end])
}

/// Prompt asking for a single JSON object describing a website about `topic`.
pub fn build_prompt(topic: &str) -> String {
    format!(
        "Create a complete, modern, responsive single-page website about: \"{topic}\".\n\
         Respond with ONLY a JSON object, no markdown and no commentary, of the form:\n\
         {{\"html\": \"<body markup without <html>, <head> or <body> tags>\", \
         \"css\": \"<stylesheet>\", \"js\": \"<script, may be empty>\"}}\n\
         All three values must be JSON strings with properly escaped quotes and newlines."
    )
}

/// Request body for `generateContent`.
pub fn build_request(prompt: &str, with_safety_settings: bool) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: Some(prompt.to_string()),
            }],
        }],
        safety_settings: with_safety_settings.then(safety_settings),
    }
}

fn safety_settings() -> Vec<SafetySetting> {
    SAFETY_CATEGORIES
        .iter()
        .map(|category| SafetySetting {
            category: category.to_string(),
            threshold: SAFETY_THRESHOLD.to_string(),
        })
        .collect()
}

/// Text at `candidates[0].content.parts[0].text` of a raw response body.
pub fn envelope_text(body: &str) -> Result<String, GenerationError> {
    let envelope: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
        GenerationError::Parse(format!("Malformed Gemini response envelope: {}", e))
    })?;

    envelope.first_text().map(str::to_string).ok_or_else(|| {
        GenerationError::Parse("Gemini response contained no candidate text".to_string())
    })
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_settings: Option<Vec<SafetySetting>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}
