//! Measurement provider adapter.
//!
//! A provider takes an image and returns validated suture observations, or
//! fails. Network-backed and canned implementations share one parse path.

pub mod fake;
pub mod openai;
pub mod parse;
pub(crate) mod prompt;

use async_trait::async_trait;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

use crate::error::{EvalError, EvalResult};
use crate::model::Measurement;

pub use fake::FakeProvider;
pub use openai::OpenAiVisionProvider;

/// Per-call options supplied by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeasureOptions {
    /// Upper bound for the whole round trip. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl MeasureOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

#[async_trait]
pub trait MeasurementProvider: Send + Sync {
    async fn measure(&self, image: &Path, options: &MeasureOptions) -> EvalResult<Measurement>;

    fn provider_name(&self) -> &'static str;
}

/// Bound `fut` by the caller's deadline, if any.
pub(crate) async fn bounded<T>(
    options: &MeasureOptions,
    fut: impl Future<Output = EvalResult<T>>,
) -> EvalResult<T> {
    match options.timeout {
        Some(timeout) => tokio::time::timeout(timeout, fut)
            .await
            .map_err(|_| EvalError::Timeout { timeout })?,
        None => fut.await,
    }
}
