//! Evaluation of sutured skin-model wound photographs.
//!
//! The pipeline has three stages, run in order for every image:
//!
//! - Scale estimation (pixels per millimetre), see [`scale`]
//! - Suture measurement by an external vision model, see [`providers`]
//! - Deductive scoring and aggregation, see [`scoring`]
//!
//! [`Evaluator`] sequences them and assembles an [`EvaluationReport`].
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use suture_core::{Evaluator, OpenAiVisionProvider};
//!
//! # async fn example() -> Result<(), suture_core::EvalError> {
//! let provider = OpenAiVisionProvider::from_env()?;
//! let report = Evaluator::new(Arc::new(provider))
//!     .evaluate("wound.jpg")
//!     .await?;
//! println!("final score: {}", report.final_average_score);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `SUTURE_API_KEY` | Provider bearer token (required for live calls) |
//! | `SUTURE_BASE_URL` | OpenAI-compatible base URL |
//! | `SUTURE_MODEL` | Vision model identifier |
//! | `SUTURE_MAX_TOKENS` | Completion token cap (default: 2000) |
//! | `SUTURE_TIMEOUT` | HTTP timeout in seconds (default: 120) |

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod providers;
pub mod report;
pub mod scale;
pub mod scoring;

pub use config::ProviderConfig;
pub use engine::{report_from_raw, Evaluator};
pub use error::{EvalError, EvalResult};
pub use model::{
    DistanceMetric, EvaluationReport, Measurement, ScaleCalibration, ScaleInfo, ScoreEntry,
    SutureId, SutureObservation, REPORT_VERSION,
};
pub use providers::{FakeProvider, MeasureOptions, MeasurementProvider, OpenAiVisionProvider};
pub use scale::{FixedScaleEstimator, RulerHeuristicEstimator, ScaleBand, ScaleEstimator};
pub use scoring::{score, ScoreSummary};
