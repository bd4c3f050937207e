use crate::dtos::{ExtractedSite, GenerateRequest};
use crate::services::GenerationError;
use crate::startup::AppState;
use crate::utils::JsonBody;
use axum::{extract::State, Json};
use secrecy::ExposeSecret;
use service_core::error::AppError;

/// `POST /generate`: turn a topic into a generated website.
#[tracing::instrument(skip(state, request), fields(service = "sitegen-service"))]
pub async fn generate_site(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<GenerateRequest>,
) -> Result<Json<ExtractedSite>, AppError> {
    let api_key = state
        .config
        .google
        .api_key
        .as_ref()
        .ok_or(GenerationError::Configuration)?;

    let topic = request.topic().ok_or(GenerationError::Validation)?;

    let site = state
        .generator
        .generate(topic, api_key.expose_secret())
        .await?;

    Ok(Json(site))
}
