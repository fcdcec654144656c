use crate::model::EvaluationReport;
use std::path::Path;

pub fn to_json_pretty(report: &EvaluationReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

pub fn write_json(report: &EvaluationReport, out: &Path) -> std::io::Result<()> {
    let json = to_json_pretty(report).map_err(std::io::Error::other)?;
    std::fs::write(out, json)
}
