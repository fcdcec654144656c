use crate::model::{EvaluationReport, ScoreEntry};
use std::fmt::Write as _;

/// Human-readable summary. Deterministic apart from the report's own fields.
#[must_use]
pub fn format_report(report: &EvaluationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Image: {}", report.image_id);
    let _ = writeln!(out, "Scale: {:.2} px/mm", report.scale.pixels_per_mm);
    let _ = writeln!(out);
    for entry in &report.scores {
        let _ = writeln!(out, "{}", format_entry(entry));
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Final average score: {:.1} (valid {}, abnormal {}, total {})",
        report.final_average_score, report.valid_count, report.abnormal_count, report.total_count
    );
    out
}

fn format_entry(entry: &ScoreEntry) -> String {
    let position = if entry.position.is_empty() {
        String::new()
    } else {
        format!(" [{}]", entry.position)
    };
    let mut line = format!(
        "  #{}{}: far {:.2} mm -> {}, near {:.2} mm -> {}, total {}",
        entry.group_id,
        position,
        entry.avr_far_points.average_distance_mm,
        entry.avr_far_points.score,
        entry.avr_near_points.average_distance_mm,
        entry.avr_near_points.score,
        entry.total_score
    );
    if entry.is_abnormal {
        line.push_str(" (abnormal");
        if !entry.abnormal_reason.is_empty() {
            line.push_str(": ");
            line.push_str(&entry.abnormal_reason);
        }
        line.push(')');
    }
    line
}
