/// Instruction sent with every image.
///
/// The scale and pixel ranges are context for the model only; the pipeline
/// never reads them back.
pub(crate) const MEASUREMENT_PROMPT: &str = r#"You are an expert surgical evaluator. Analyze this image of a sutured skin block.
Identify the wound (the long black line) and the sutures (the black threads crossing it).

Task: identify exactly 3 representative suture stitches: one from the left part, one from the center, one from the right part of the wound. For each, provide near-point and far-point pixel distances.

For each suture provide:
1. id: 1, 2, or 3.
2. position: a short label, e.g. "upper left", "center", "lower right".
3. far_point_distance_px: perpendicular distance from the far point to the wound line, in pixels.
4. near_point_distance_px: perpendicular distance from the near point (entry/exit) to the wound line, in pixels.
5. is_abnormal: false normally; true only if this suture is blurred, an outlier, or incomplete.
6. abnormal_reason: "" normally; a short reason if is_abnormal is true.

Image scale is about 14 px/mm. Typical values: far 91-98 px, near 21-42 px. Base your answer on the actual image.

Return ONLY a valid JSON object (no markdown, no explanation):
{
    "sutures": [
        {"id": 1, "position": "upper left", "far_point_distance_px": 93, "near_point_distance_px": 28, "is_abnormal": false, "abnormal_reason": ""},
        {"id": 2, "position": "center", "far_point_distance_px": 95, "near_point_distance_px": 32, "is_abnormal": false, "abnormal_reason": ""},
        {"id": 3, "position": "lower right", "far_point_distance_px": 97, "near_point_distance_px": 35, "is_abnormal": false, "abnormal_reason": ""}
    ]
}"#;
