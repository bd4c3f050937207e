//! Recovery of the JSON payload embedded in a model's text completion.
//!
//! Completions often wrap the object in prose or code fences, so the payload
//! is taken to be everything from the first `{` to the last `}`. Braces in
//! surrounding prose can defeat this; the provider gives no stronger
//! guarantee, so the heuristic is kept simple.

use super::error::GenerationError;
use crate::dtos::ExtractedSite;
use serde_json::Value;

pub const JSON_NOT_FOUND: &str = "JSON not found";
pub const JSON_PARSE_FAILED: &str = "Failed to parse JSON from AI response";
pub const SITE_SHAPE_INVALID: &str = "AI response JSON is not a website object";

/// Parse the outermost `{ ... }` span of `text`.
pub fn extract_json(text: &str) -> Result<Value, GenerationError> {
    let start = text.find('{');
    let end = text.rfind('}');

    let (start, end) = match (start, end) {
        (Some(s), Some(e)) if s <= e => (s, e),
        _ => return Err(GenerationError::Parse(JSON_NOT_FOUND.to_string())),
    };

    serde_json::from_str(&text[start..=end])
        .map_err(|_| GenerationError::Parse(JSON_PARSE_FAILED.to_string()))
}

/// Extract a website object (`html`, optional `css`/`js`) from `text`.
pub fn extract_site(text: &str) -> Result<ExtractedSite, GenerationError> {
    let value = extract_json(text)?;
    serde_json::from_value(value).map_err(|e| {
        tracing::debug!(error = %e, "Extracted JSON does not match website shape");
        GenerationError::Parse(SITE_SHAPE_INVALID.to_string())
    })
}
