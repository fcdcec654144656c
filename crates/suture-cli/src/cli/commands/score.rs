use anyhow::Context;
use serde_json::Value;
use suture_core::providers::parse::strip_code_fences;
use suture_core::{report_from_raw, EvalError, ScaleCalibration};

use crate::cli::args::ScoreArgs;
use crate::exit_codes::SUCCESS;

pub(crate) fn run(args: ScoreArgs) -> anyhow::Result<i32> {
    let scale = ScaleCalibration::new(args.scale).ok_or_else(|| EvalError::Config {
        message: format!("--scale must be positive, got {}", args.scale),
    })?;

    let text = std::fs::read_to_string(&args.raw)
        .with_context(|| format!("failed to read {}", args.raw.display()))?;
    let value: Value = serde_json::from_str(&strip_code_fences(&text)).map_err(|e| {
        EvalError::InvalidJson {
            message: e.to_string(),
        }
    })?;

    // A saved report carries the provider object under raw_ai_result.
    let (raw, stored_id) = match value.get("raw_ai_result") {
        Some(raw) => (
            raw.clone(),
            value.get("image_id").and_then(Value::as_str).map(String::from),
        ),
        None => (value, None),
    };

    let image_id = args
        .image_id
        .or(stored_id)
        .or_else(|| {
            args.raw
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_default();

    let report = report_from_raw(image_id, scale, raw)?;
    super::output::emit(&report, &args.output)?;
    Ok(SUCCESS)
}
