#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use secrecy::Secret;
use serde_json::{json, Value};
use sitegen_service::config::SitegenConfig;
use sitegen_service::services::MockTransport;
use sitegen_service::startup::{build_router, AppState};
use std::sync::Arc;
use tower::util::ServiceExt;

pub const TEST_API_KEY: &str = "test-api-key";
pub const MODEL_A: &str = "model-a";
pub const MODEL_B: &str = "model-b";

/// Config with two models, a fake key and millisecond retry delays.
pub fn test_config() -> SitegenConfig {
    let mut config = SitegenConfig::default();
    config.common.port = 0;
    config.google.api_key = Some(Secret::new(TEST_API_KEY.to_string()));
    config.google.api_base = "http://mock.local/v1beta".to_string();
    config.models.fallback_models = vec![MODEL_A.to_string(), MODEL_B.to_string()];
    config.retry.delay_ms = 1;
    config
}

/// Gemini envelope whose candidate text is `text`.
pub fn envelope(text: &str) -> String {
    json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    })
    .to_string()
}

/// Envelope wrapping a website object in prose, the way models tend to reply.
pub fn site_envelope(html: &str, css: &str, js: &str) -> String {
    let payload = json!({ "html": html, "css": css, "js": js });
    envelope(&format!("Sure! Here is your site:\n```json\n{}\n```", payload))
}

pub struct TestApp {
    pub router: Router,
    pub transport: Arc<MockTransport>,
}

impl TestApp {
    pub fn spawn(config: SitegenConfig, transport: MockTransport) -> Self {
        let transport = Arc::new(transport);
        let state = AppState::new(config, transport.clone());
        TestApp {
            router: build_router(state),
            transport,
        }
    }

    pub async fn post_generate(&self, body: Value) -> (StatusCode, Value) {
        self.post_generate_raw(body.to_string(), Some("application/json"))
            .await
    }

    /// POST an arbitrary body, optionally without a content type.
    pub async fn post_generate_raw(
        &self,
        body: impl Into<Body>,
        content_type: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method("POST").uri("/generate");
        if let Some(content_type) = content_type {
            request = request.header("content-type", content_type);
        }

        let response = self
            .router
            .clone()
            .oneshot(request.body(body.into()).unwrap())
            .await
            .unwrap();

        read_json(response).await
    }
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
