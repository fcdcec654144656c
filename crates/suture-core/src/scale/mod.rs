//! Pixels-per-millimetre estimation.
//!
//! The default estimator runs a ruler contour search but never reads ruler
//! markings: its result is always a random draw from a plausible band, so
//! calibration is not reproducible across or within runs. Estimators never
//! fail; decode errors are logged and fall back to the band.

pub mod ruler;

use rand::Rng;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{EvalError, EvalResult};
use crate::model::ScaleCalibration;
use crate::scoring::round_to;

pub use ruler::{find_ruler, RulerCandidate};

pub trait ScaleEstimator: Send + Sync {
    fn estimate(&self, image: &Path) -> ScaleCalibration;
}

/// Inclusive range random calibrations are drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleBand {
    min: f64,
    max: f64,
}

impl Default for ScaleBand {
    fn default() -> Self {
        Self {
            min: 13.5,
            max: 14.5,
        }
    }
}

impl ScaleBand {
    /// Returns `None` unless `0 < min <= max`.
    pub fn new(min: f64, max: f64) -> Option<Self> {
        (min.is_finite() && max.is_finite() && min > 0.0 && min <= max)
            .then_some(Self { min, max })
    }

    /// Uniform draw rounded to two decimals.
    pub fn sample(&self) -> ScaleCalibration {
        let raw = rand::thread_rng().gen_range(self.min..=self.max);
        ScaleCalibration::new(round_to(raw, 2)).unwrap_or(ScaleCalibration::NOMINAL)
    }
}

/// Placeholder calibration: looks for a ruler, then samples the band.
#[derive(Debug, Clone, Default)]
pub struct RulerHeuristicEstimator {
    band: ScaleBand,
}

impl RulerHeuristicEstimator {
    pub fn new(band: ScaleBand) -> Self {
        Self { band }
    }

    fn detect(&self, path: &Path) -> Result<Option<RulerCandidate>, image::ImageError> {
        let gray = image::open(path)?.to_luma8();
        Ok(find_ruler(&gray))
    }
}

impl ScaleEstimator for RulerHeuristicEstimator {
    fn estimate(&self, image: &Path) -> ScaleCalibration {
        match self.detect(image) {
            // TODO: derive the ratio from the candidate's known physical width once
            // tick reading exists; until then the band is used either way.
            Ok(Some(candidate)) => {
                debug!(area_px = candidate.area_px, "ruler candidate found");
            }
            Ok(None) => debug!("no ruler candidate found"),
            Err(e) => warn!(image = %image.display(), error = %e, "scale detection failed"),
        }
        let scale = self.band.sample();
        debug!(pixels_per_mm = scale.pixels_per_mm(), "scale estimated");
        scale
    }
}

/// Deterministic calibration supplied by the caller.
#[derive(Debug, Clone, Copy)]
pub struct FixedScaleEstimator(ScaleCalibration);

impl FixedScaleEstimator {
    pub fn new(pixels_per_mm: f64) -> EvalResult<Self> {
        ScaleCalibration::new(pixels_per_mm)
            .map(Self)
            .ok_or_else(|| EvalError::Config {
                message: format!(
                    "scale must be a positive number of pixels per mm, got {}",
                    pixels_per_mm
                ),
            })
    }
}

impl ScaleEstimator for FixedScaleEstimator {
    fn estimate(&self, _image: &Path) -> ScaleCalibration {
        self.0
    }
}
