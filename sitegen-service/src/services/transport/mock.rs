//! Scripted transport for tests.

use super::{HttpTransport, TransportResponse};
use crate::services::error::GenerationError;
use crate::services::gemini::model_from_url;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Replies per model id are served in order; the last one repeats once the
/// script runs out. Models with no script get a 404.
#[derive(Default)]
pub struct MockTransport {
    scripts: Mutex<HashMap<String, VecDeque<Result<TransportResponse, GenerationError>>>>,
    calls: Mutex<Vec<MockCall>>,
}

/// One recorded request.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub model: String,
    pub url: String,
    pub body: serde_json::Value,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for `model`.
    pub fn respond(self, model: &str, status: u16, body: impl Into<String>) -> Self {
        self.push(model, Ok(TransportResponse::new(status, body)))
    }

    /// Queue a network failure for `model`.
    pub fn fail(self, model: &str, message: &str) -> Self {
        self.push(model, Err(GenerationError::Transport(message.to_string())))
    }

    fn push(self, model: &str, reply: Result<TransportResponse, GenerationError>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(model.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Every request made so far, oldest first.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Model ids in the order they were called.
    pub fn called_models(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.model).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, GenerationError> {
        let model = model_from_url(url).unwrap_or_default().to_string();

        self.calls.lock().unwrap().push(MockCall {
            model: model.clone(),
            url: url.to_string(),
            body: body.clone(),
        });

        let mut scripts = self.scripts.lock().unwrap();
        let reply = match scripts.get_mut(&model) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        reply.unwrap_or_else(|| Ok(TransportResponse::new(404, "no scripted reply")))
    }
}
