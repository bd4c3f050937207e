//! Single outbound call with a bounded retry on provider overload.
//!
//! Status handling:
//! - 2xx: returned immediately.
//! - 429: quota exhausted; waiting will not help, fail without retrying.
//! - 503: transient overload; sleep a fixed delay and try again.
//! - anything else: fail immediately with the status and body.

use super::error::GenerationError;
use super::metrics::record_provider_attempt;
use super::transport::{HttpTransport, TransportResponse};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{info, warn};

const STATUS_QUOTA_EXCEEDED: u16 = 429;
const STATUS_OVERLOADED: u16 = 503;

/// Configuration for the overload retry loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per call, including the first.
    pub max_attempts: u32,
    /// Fixed pause after each overloaded response.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(2000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

/// POST `body` to `url`, retrying on 503 per `policy`.
///
/// `label` names the call in log lines; the URL itself is never logged
/// because it carries the API key.
pub async fn fetch_with_retry(
    transport: &dyn HttpTransport,
    url: &str,
    body: &serde_json::Value,
    policy: &RetryPolicy,
    label: &str,
) -> Result<TransportResponse, GenerationError> {
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let started = Instant::now();
        let response = match transport.post_json(url, body).await {
            Ok(response) => response,
            Err(e) => {
                record_provider_attempt(
                    label,
                    "transport_error",
                    started.elapsed().as_secs_f64(),
                );
                return Err(e);
            }
        };
        record_provider_attempt(
            label,
            outcome(response.status),
            started.elapsed().as_secs_f64(),
        );

        if response.is_success() {
            if attempt > 1 {
                info!(model = label, attempt, "Request succeeded after retry");
            }
            return Ok(response);
        }

        match response.status {
            STATUS_QUOTA_EXCEEDED => {
                warn!(model = label, "Quota exceeded, not retrying");
                return Err(GenerationError::QuotaExceeded {
                    body: response.body,
                });
            }
            STATUS_OVERLOADED => {
                if attempt == max_attempts {
                    break;
                }
                warn!(
                    model = label,
                    attempt,
                    delay = ?policy.delay,
                    "Model overloaded, retrying after delay"
                );
                sleep(policy.delay).await;
            }
            status => {
                return Err(GenerationError::Upstream {
                    status,
                    body: response.body,
                });
            }
        }
    }

    warn!(
        model = label,
        attempts = max_attempts,
        "Model still overloaded after max attempts"
    );
    Err(GenerationError::TransientExhausted {
        attempts: max_attempts,
    })
}

fn outcome(status: u16) -> &'static str {
    match status {
        200..=299 => "success",
        STATUS_QUOTA_EXCEEDED => "quota_exceeded",
        STATUS_OVERLOADED => "overloaded",
        _ => "upstream_error",
    }
}
