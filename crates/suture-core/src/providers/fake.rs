//! Canned provider for offline runs and tests.

use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

use super::parse::parse_measurement;
use super::{bounded, MeasureOptions, MeasurementProvider};
use crate::error::{EvalError, EvalResult};
use crate::model::Measurement;

/// Five sutures, one flagged abnormal.
pub const DEMO_RESPONSE: &str = r#"{
  "sutures": [
    {"id": 1, "position": "left end", "far_point_distance_px": 93, "near_point_distance_px": 28, "is_abnormal": false, "abnormal_reason": ""},
    {"id": 2, "position": "left middle", "far_point_distance_px": 95, "near_point_distance_px": 32, "is_abnormal": false, "abnormal_reason": ""},
    {"id": 3, "position": "center", "far_point_distance_px": 96, "near_point_distance_px": 35, "is_abnormal": false, "abnormal_reason": ""},
    {"id": 4, "position": "right middle", "far_point_distance_px": 128, "near_point_distance_px": 42, "is_abnormal": true, "abnormal_reason": "locally blurred"},
    {"id": 5, "position": "right end", "far_point_distance_px": 94, "near_point_distance_px": 26, "is_abnormal": false, "abnormal_reason": ""}
  ]
}"#;

/// Replays fixed response text through the same parse path as live calls.
#[derive(Debug, Clone)]
pub struct FakeProvider {
    content: String,
}

impl FakeProvider {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn demo() -> Self {
        Self::new(DEMO_RESPONSE)
    }

    pub fn from_file(path: &Path) -> EvalResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EvalError::Config {
            message: format!("failed to read fake response {}: {}", path.display(), e),
        })?;
        Ok(Self::new(content))
    }
}

#[async_trait]
impl MeasurementProvider for FakeProvider {
    async fn measure(&self, image: &Path, options: &MeasureOptions) -> EvalResult<Measurement> {
        debug!(image = %image.display(), "serving canned measurement");
        bounded(options, async { parse_measurement(&self.content) }).await
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_response_parses() {
        let m = FakeProvider::demo()
            .measure(Path::new("any.jpg"), &MeasureOptions::default())
            .await
            .unwrap();
        assert_eq!(m.sutures.len(), 5);
        assert_eq!(m.sutures.iter().filter(|s| s.is_abnormal).count(), 1);
    }

    #[tokio::test]
    async fn canned_errors_surface_unchanged() {
        let err = FakeProvider::new("")
            .measure(Path::new("any.jpg"), &MeasureOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EvalError::EmptyResponse));
    }
}
