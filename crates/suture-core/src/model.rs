//! Data model shared by the estimator, the provider adapter and the scorer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Report schema version.
pub const REPORT_VERSION: &str = "1.0";

/// Pixels-per-millimetre ratio for one evaluation.
///
/// Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ScaleCalibration(f64);

impl ScaleCalibration {
    /// Centre of the placeholder band.
    pub const NOMINAL: Self = Self(14.0);

    /// Returns `None` for zero, negative or non-finite ratios.
    pub fn new(pixels_per_mm: f64) -> Option<Self> {
        (pixels_per_mm.is_finite() && pixels_per_mm > 0.0).then_some(Self(pixels_per_mm))
    }

    pub fn pixels_per_mm(self) -> f64 {
        self.0
    }

    /// Convert a pixel distance to millimetres.
    pub fn to_mm(self, px: f64) -> f64 {
        px / self.0
    }
}

/// Identifier of a suture group, as assigned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SutureId {
    Number(u64),
    Text(String),
}

impl fmt::Display for SutureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One suture measured by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SutureObservation {
    pub id: SutureId,
    /// Free-text location label (e.g. left/center/right).
    pub position: String,
    pub far_point_distance_px: f64,
    pub near_point_distance_px: f64,
    pub is_abnormal: bool,
    /// Empty unless `is_abnormal`.
    pub abnormal_reason: String,
}

/// Validated provider output.
#[derive(Debug, Clone)]
pub struct Measurement {
    pub sutures: Vec<SutureObservation>,
    /// Parsed provider object, kept verbatim for audit.
    pub raw: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMetric {
    /// Rounded to two decimals.
    pub average_distance_mm: f64,
    pub score: u8,
}

/// Scored suture group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub group_id: SutureId,
    pub position: String,
    pub is_abnormal: bool,
    pub abnormal_reason: String,
    pub avr_far_points: DistanceMetric,
    pub avr_near_points: DistanceMetric,
    pub total_score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleInfo {
    pub pixels_per_mm: f64,
}

/// Final evaluation report.
///
/// Field names and nesting are the wire contract consumed by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub version: String,
    pub image_id: String,
    /// RFC 3339.
    pub timestamp: String,
    pub scale: ScaleInfo,
    pub scores: Vec<ScoreEntry>,
    pub final_average_score: f64,
    pub valid_count: usize,
    pub abnormal_count: usize,
    pub total_count: usize,
    pub raw_ai_result: serde_json::Value,
}
