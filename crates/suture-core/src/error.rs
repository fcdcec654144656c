//! Error types for the evaluation pipeline.

use std::time::Duration;

/// Evaluation errors.
///
/// Scale calibration never appears here: the estimator always falls back to
/// a usable value.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// The image could not be read or encoded for transport.
    #[error("image error: {path}: {message}")]
    Image { path: String, message: String },

    /// Provider configuration is missing or invalid.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// The provider could not be reached.
    #[error("network error: {message}")]
    Network { message: String },

    /// The provider answered with a non-success HTTP status.
    #[error("provider returned HTTP {status}: {body}")]
    ProviderStatus { status: u16, body: String },

    /// The caller-supplied deadline elapsed before the provider answered.
    #[error("provider did not answer within {timeout:?}")]
    Timeout { timeout: Duration },

    /// The provider answered without any content.
    #[error("provider returned an empty response")]
    EmptyResponse,

    /// The provider content is not parseable JSON.
    #[error("provider response is not valid JSON: {message}")]
    InvalidJson { message: String },

    /// The provider JSON lacks a usable `sutures` list.
    #[error("provider response has no usable sutures list: {message}")]
    InvalidSchema { message: String },

    /// The provider returned a well-formed but empty observation list.
    #[error("no sutures were identified; make sure the image shows a clear wound line and sutures")]
    NoMeasurements,
}

impl EvalError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,

            Self::Network { .. }
            | Self::ProviderStatus { .. }
            | Self::Timeout { .. }
            | Self::EmptyResponse
            | Self::InvalidJson { .. }
            | Self::InvalidSchema { .. } => 3,

            Self::NoMeasurements => 4,

            Self::Image { .. } => 1,
        }
    }

    /// Whether the failure originated at the measurement provider.
    pub fn is_provider_failure(&self) -> bool {
        self.exit_code() == 3
    }

    pub(crate) fn image(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        Self::Image {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for EvalError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Result type for evaluation operations.
pub type EvalResult<T> = Result<T, EvalError>;
