//! Evaluation orchestrator: scale, then measurement, then scoring.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{EvalError, EvalResult};
use crate::model::{EvaluationReport, Measurement, ScaleCalibration, ScaleInfo, REPORT_VERSION};
use crate::providers::parse::observations_from_value;
use crate::providers::{MeasureOptions, MeasurementProvider};
use crate::scale::{RulerHeuristicEstimator, ScaleEstimator};
use crate::scoring::score;

/// Runs one evaluation per call. Holds no per-evaluation state.
#[derive(Clone)]
pub struct Evaluator {
    scale: Arc<dyn ScaleEstimator>,
    provider: Arc<dyn MeasurementProvider>,
    options: MeasureOptions,
}

impl Evaluator {
    /// Uses the default ruler heuristic for calibration.
    pub fn new(provider: Arc<dyn MeasurementProvider>) -> Self {
        Self {
            scale: Arc::new(RulerHeuristicEstimator::default()),
            provider,
            options: MeasureOptions::default(),
        }
    }

    pub fn with_scale_estimator(mut self, scale: Arc<dyn ScaleEstimator>) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_options(mut self, options: MeasureOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn evaluate(&self, image_path: impl AsRef<Path>) -> EvalResult<EvaluationReport> {
        let requested = image_path.as_ref();
        let image = std::path::absolute(requested).map_err(|e| EvalError::image(requested, e))?;

        // image decoding and edge detection run on the blocking pool
        let scale = {
            let estimator = Arc::clone(&self.scale);
            let path = image.clone();
            tokio::task::spawn_blocking(move || estimator.estimate(&path))
                .await
                .map_err(|e| EvalError::image(&image, e))?
        };
        let measurement = self.provider.measure(&image, &self.options).await?;

        if measurement.sutures.is_empty() {
            warn!(
                image = %image.display(),
                provider = self.provider.provider_name(),
                "provider returned no sutures"
            );
            return Err(EvalError::NoMeasurements);
        }

        let report = assemble_report(image_id(&image), scale, measurement);
        info!(
            image_id = %report.image_id,
            pixels_per_mm = report.scale.pixels_per_mm,
            final_average_score = report.final_average_score,
            total_count = report.total_count,
            "evaluation complete"
        );
        Ok(report)
    }
}

/// Re-score a stored provider object without calling the provider.
pub fn report_from_raw(
    image_id: impl Into<String>,
    scale: ScaleCalibration,
    raw: serde_json::Value,
) -> EvalResult<EvaluationReport> {
    let sutures = observations_from_value(&raw)?;
    if sutures.is_empty() {
        return Err(EvalError::NoMeasurements);
    }
    Ok(assemble_report(
        image_id.into(),
        scale,
        Measurement { sutures, raw },
    ))
}

fn assemble_report(
    image_id: String,
    scale: ScaleCalibration,
    measurement: Measurement,
) -> EvaluationReport {
    let summary = score(&measurement.sutures, scale);
    EvaluationReport {
        version: REPORT_VERSION.to_string(),
        image_id,
        timestamp: chrono::Utc::now().to_rfc3339(),
        scale: ScaleInfo {
            pixels_per_mm: scale.pixels_per_mm(),
        },
        scores: summary.entries,
        final_average_score: summary.final_average_score,
        valid_count: summary.valid_count,
        abnormal_count: summary.abnormal_count,
        total_count: summary.total_count,
        raw_ai_result: measurement.raw,
    }
}

fn image_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
