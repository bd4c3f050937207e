//! Failure taxonomy for site generation.

use service_core::error::AppError;
use thiserror::Error;

/// Message returned to callers that omit both `topic` and `prompt`.
pub const TOPIC_REQUIRED: &str = "Topic or prompt is required.";

/// Error type for generation operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("{}", TOPIC_REQUIRED)]
    Validation,

    #[error("Gemini API key is not configured")]
    Configuration,

    #[error("Quota exceeded (429): {body}")]
    QuotaExceeded { body: String },

    #[error("Model overloaded (503) after {attempts} attempts")]
    TransientExhausted { attempts: u32 },

    #[error("Upstream error {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("{0}")]
    Parse(String),

    #[error("All models failed to generate a website: {}", summarize(.failures))]
    AllModelsExhausted { failures: Vec<ModelFailure> },
}

/// One model's terminal failure inside a fallback run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFailure {
    pub model: String,
    pub reason: String,
}

impl GenerationError {
    /// Stable snake_case name of the variant, used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Validation => "validation_error",
            GenerationError::Configuration => "configuration_error",
            GenerationError::QuotaExceeded { .. } => "quota_exceeded",
            GenerationError::TransientExhausted { .. } => "transient_exhausted",
            GenerationError::Upstream { .. } => "upstream_error",
            GenerationError::Transport(_) => "transport_error",
            GenerationError::Parse(_) => "parse_error",
            GenerationError::AllModelsExhausted { .. } => "all_models_exhausted",
        }
    }
}

fn summarize(failures: &[ModelFailure]) -> String {
    if failures.is_empty() {
        return "no models configured".to_string();
    }
    failures
        .iter()
        .map(|f| format!("{}: {}", f.model, f.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Validation => AppError::BadRequest(anyhow::anyhow!(TOPIC_REQUIRED)),
            other => AppError::ServiceUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_message_lists_every_model() {
        let err = GenerationError::AllModelsExhausted {
            failures: vec![
                ModelFailure {
                    model: "a".to_string(),
                    reason: "Quota exceeded (429): {}".to_string(),
                },
                ModelFailure {
                    model: "b".to_string(),
                    reason: "JSON not found".to_string(),
                },
            ],
        };

        assert_eq!(
            err.to_string(),
            "All models failed to generate a website: a: Quota exceeded (429): {}; b: JSON not found"
        );
    }

    #[test]
    fn kind_names_per_model_failures() {
        assert_eq!(
            GenerationError::QuotaExceeded {
                body: String::new()
            }
            .kind(),
            "quota_exceeded"
        );
        assert_eq!(
            GenerationError::TransientExhausted { attempts: 3 }.kind(),
            "transient_exhausted"
        );
        assert_eq!(GenerationError::Parse("x".to_string()).kind(), "parse_error");
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let app: AppError = GenerationError::Validation.into();
        assert!(matches!(app, AppError::BadRequest(_)));
        assert_eq!(app.to_string(), format!("Bad request: {}", TOPIC_REQUIRED));
    }

    #[test]
    fn everything_else_maps_to_service_unavailable() {
        let app: AppError = GenerationError::Configuration.into();
        assert!(matches!(app, AppError::ServiceUnavailable(_)));
    }
}
