use crate::services::fetcher::RetryPolicy;
use crate::services::gemini::GEMINI_API_BASE;
use crate::services::generator::GeneratorSettings;
use secrecy::Secret;
use serde::Deserialize;
use service_core::config::{self as core_config, get_env, is_production, split_list};
use service_core::error::AppError;
use std::env;
use std::time::Duration;

/// Fallback order used when `SITEGEN_MODELS` is not set.
pub const DEFAULT_MODELS: [&str; 4] = [
    "gemini-3.0-pro-exp",
    "gemini-2.5-flash",
    "gemini-2.0-flash",
    "gemini-1.5-flash",
];

const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 2000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Deserialize)]
pub struct SitegenConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub google: GoogleConfig,
    pub models: ModelConfig,
    pub retry: RetryConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    /// Missing keys are reported per request, not at startup.
    pub api_key: Option<Secret<String>>,
    pub api_base: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Fallback priority list, tried first to last.
    pub fallback_models: Vec<String>,
    pub safety_settings: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub allowed_origins: Vec<String>,
    /// Directory served for unmatched GET paths, if any.
    pub static_dir: Option<String>,
}

impl SitegenConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = is_production();

        let api_key = env::var("GOOGLE_API_KEY")
            .or_else(|_| env::var("GEMINI_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(Secret::new);

        Ok(SitegenConfig {
            common: common_config,
            google: GoogleConfig {
                api_key,
                api_base: get_env("GEMINI_API_BASE", Some(GEMINI_API_BASE), is_prod)?,
                request_timeout_secs: parse_env(
                    "SITEGEN_REQUEST_TIMEOUT_SECS",
                    DEFAULT_REQUEST_TIMEOUT_SECS,
                )?,
            },
            models: ModelConfig {
                fallback_models: split_list(&get_env(
                    "SITEGEN_MODELS",
                    Some(&DEFAULT_MODELS.join(",")),
                    is_prod,
                )?),
                safety_settings: parse_env("SITEGEN_SAFETY_SETTINGS", true)?,
            },
            retry: RetryConfig {
                max_attempts: parse_env("SITEGEN_RETRY_MAX_ATTEMPTS", DEFAULT_RETRY_MAX_ATTEMPTS)?,
                delay_ms: parse_env("SITEGEN_RETRY_DELAY_MS", DEFAULT_RETRY_DELAY_MS)?,
            },
            http: HttpConfig {
                allowed_origins: split_list(
                    &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
                ),
                static_dir: env::var("STATIC_DIR").ok().filter(|d| !d.is_empty()),
            },
        })
    }

    /// Generator settings derived from this configuration.
    pub fn generator_settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            api_base: self.google.api_base.clone(),
            models: self.models.fallback_models.clone(),
            safety_settings: self.models.safety_settings,
            retry: RetryPolicy::new(
                self.retry.max_attempts,
                Duration::from_millis(self.retry.delay_ms),
            ),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.google.request_timeout_secs)
    }
}

impl Default for SitegenConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            google: GoogleConfig {
                api_key: None,
                api_base: GEMINI_API_BASE.to_string(),
                request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            },
            models: ModelConfig {
                fallback_models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
                safety_settings: true,
            },
            retry: RetryConfig {
                max_attempts: DEFAULT_RETRY_MAX_ATTEMPTS,
                delay_ms: DEFAULT_RETRY_DELAY_MS,
            },
            http: HttpConfig {
                allowed_origins: vec!["*".to_string()],
                static_dir: None,
            },
        }
    }
}

/// Parse an optional variable, keeping `default` when it is unset.
fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid value for {}: {}", key, e)))
}
