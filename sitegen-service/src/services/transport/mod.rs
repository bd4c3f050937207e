//! Outbound HTTP seam.
//!
//! The generator only needs "POST this JSON, give me status and body", so the
//! transport is a trait: `ReqwestTransport` talks to the network and
//! `MockTransport` serves scripted replies in tests.

pub mod client;
pub mod mock;

pub use client::ReqwestTransport;
pub use mock::MockTransport;

use super::error::GenerationError;
use async_trait::async_trait;

/// Status and raw body of one outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for POSTing JSON to the provider.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `body` to `url`. Only failures to obtain a response are errors;
    /// non-2xx statuses come back as a `TransportResponse`.
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, GenerationError>;
}
