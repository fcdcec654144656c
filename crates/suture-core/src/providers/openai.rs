//! OpenAI-compatible chat completions client for vision models.

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use super::parse::parse_measurement;
use super::prompt::MEASUREMENT_PROMPT;
use super::{bounded, MeasureOptions, MeasurementProvider};
use crate::config::ProviderConfig;
use crate::error::{EvalError, EvalResult};
use crate::model::Measurement;

const USER_AGENT_VALUE: &str = concat!("suture-core/", env!("CARGO_PKG_VERSION"));

/// Sends one image plus the measurement instruction per call. No retries.
#[derive(Debug, Clone)]
pub struct OpenAiVisionProvider {
    config: ProviderConfig,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiVisionProvider {
    pub fn new(config: ProviderConfig) -> EvalResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| EvalError::Config {
                message: "no API key configured (set SUTURE_API_KEY)".to_string(),
            })?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| EvalError::Config {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    pub fn from_env() -> EvalResult<Self> {
        Self::new(ProviderConfig::from_env())
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn measure_inner(&self, image: &Path) -> EvalResult<Measurement> {
        let image_url = encode_image(image).await?;
        let body = json!({
            "model": self.config.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": MEASUREMENT_PROMPT },
                    { "type": "image_url", "image_url": { "url": image_url } },
                ],
            }],
            "max_tokens": self.config.max_tokens,
        });

        info!(model = %self.config.model, "sending measurement request");
        let content = self.complete(&body).await?;
        debug!(content = %content, "provider content received");

        parse_measurement(&content)
    }

    async fn complete(&self, body: &Value) -> EvalResult<String> {
        let url = self.config.completions_url();
        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EvalError::ProviderStatus {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| EvalError::InvalidJson {
                message: format!("failed to parse completion envelope: {}", e),
            })?;

        let text = envelope
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(EvalError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

#[async_trait]
impl MeasurementProvider for OpenAiVisionProvider {
    async fn measure(&self, image: &Path, options: &MeasureOptions) -> EvalResult<Measurement> {
        bounded(options, self.measure_inner(image)).await
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

/// Read the image and wrap it in a base64 data URL.
pub(crate) async fn encode_image(path: &Path) -> EvalResult<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| EvalError::image(path, e))?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{};base64,{}", mime_for(path), encoded))
}

fn mime_for(path: &Path) -> &'static str {
    image::ImageFormat::from_path(path)
        .map(|f| f.to_mime_type())
        .unwrap_or("image/jpeg")
}
