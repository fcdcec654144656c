//! Measurement provider configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EvalError, EvalResult};

/// Connection settings for an OpenAI-compatible vision endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL; `/chat/completions` is appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// HTTP client timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://ark.cn-beijing.volces.com/api/v3".to_string()
}

fn default_model() -> String {
    "doubao-seed-1-6-251015".to_string()
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_timeout() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ProviderConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `SUTURE_BASE_URL` | Provider base URL |
    /// | `SUTURE_API_KEY` | Bearer token |
    /// | `SUTURE_MODEL` | Model identifier |
    /// | `SUTURE_MAX_TOKENS` | Completion token cap |
    /// | `SUTURE_TIMEOUT` | HTTP timeout in seconds |
    pub fn from_env() -> Self {
        Self::default().overlay_env()
    }

    /// Load a YAML file, then apply any environment overrides.
    pub fn from_file(path: &Path) -> EvalResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| EvalError::Config {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        let config: Self = serde_yaml::from_str(&raw).map_err(|e| EvalError::Config {
            message: format!("failed to parse {}: {}", path.display(), e),
        })?;
        Ok(config.overlay_env())
    }

    fn overlay_env(mut self) -> Self {
        if let Ok(url) = std::env::var("SUTURE_BASE_URL") {
            self.base_url = url;
        }
        if let Ok(key) = std::env::var("SUTURE_API_KEY") {
            self.api_key = Some(key);
        }
        if let Ok(model) = std::env::var("SUTURE_MODEL") {
            self.model = model;
        }
        if let Some(n) = std::env::var("SUTURE_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.max_tokens = n;
        }
        if let Some(secs) = std::env::var("SUTURE_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.timeout_secs = secs;
        }
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Full chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
