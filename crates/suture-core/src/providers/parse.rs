//! Provider response parsing and permissive field resolution.

use serde_json::{Map, Value};

use crate::error::{EvalError, EvalResult};
use crate::model::{Measurement, SutureId, SutureObservation};

/// Used when a distance is missing or not numeric.
pub const DEFAULT_DISTANCE_PX: f64 = 50.0;

const ID_KEYS: &[&str] = &["id", "group_id"];
const POSITION_KEYS: &[&str] = &["position", "location"];
const FAR_KEYS: &[&str] = &["far_point_distance_px", "farPointDistancePx"];
const NEAR_KEYS: &[&str] = &["near_point_distance_px", "nearPointDistancePx"];
const ABNORMAL_KEYS: &[&str] = &["is_abnormal", "abnormal"];
const REASON_KEYS: &[&str] = &["abnormal_reason", "abnormal_reason_cn"];

/// Remove markdown code-fence markers anywhere in the text.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse provider text into a validated measurement.
pub fn parse_measurement(content: &str) -> EvalResult<Measurement> {
    if content.trim().is_empty() {
        return Err(EvalError::EmptyResponse);
    }
    let cleaned = strip_code_fences(content);
    let raw: Value = serde_json::from_str(&cleaned).map_err(|e| EvalError::InvalidJson {
        message: e.to_string(),
    })?;
    let sutures = observations_from_value(&raw)?;
    Ok(Measurement { sutures, raw })
}

/// Validate a provider object and extract its observations.
///
/// An empty list is valid here; rejecting it is the orchestrator's job.
pub fn observations_from_value(raw: &Value) -> EvalResult<Vec<SutureObservation>> {
    let list = raw
        .get("sutures")
        .and_then(Value::as_array)
        .ok_or_else(|| EvalError::InvalidSchema {
            message: "expected a JSON object with a `sutures` array".to_string(),
        })?;

    list.iter()
        .enumerate()
        .map(|(idx, entry)| {
            let obj = entry.as_object().ok_or_else(|| EvalError::InvalidSchema {
                message: format!("sutures[{}] is not an object", idx),
            })?;
            Ok(observation_from_entry(obj, idx))
        })
        .collect()
}

fn observation_from_entry(obj: &Map<String, Value>, idx: usize) -> SutureObservation {
    SutureObservation {
        id: resolve_id(obj, ID_KEYS, idx),
        position: resolve_text(obj, POSITION_KEYS),
        far_point_distance_px: resolve_f64(obj, FAR_KEYS, DEFAULT_DISTANCE_PX),
        near_point_distance_px: resolve_f64(obj, NEAR_KEYS, DEFAULT_DISTANCE_PX),
        is_abnormal: resolve_bool(obj, ABNORMAL_KEYS),
        abnormal_reason: resolve_text(obj, REASON_KEYS),
    }
}

/// First candidate key whose value is present, non-null and non-empty.
/// Numeric zero is a real value here (a `0` id or distance is kept), unlike
/// truthiness-based fallbacks that would skip it.
fn resolve<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| match v {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        })
}

fn resolve_f64(obj: &Map<String, Value>, keys: &[&str], default: f64) -> f64 {
    resolve(obj, keys)
        .and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|n| n.is_finite())
        .unwrap_or(default)
}

fn resolve_bool(obj: &Map<String, Value>, keys: &[&str]) -> bool {
    match resolve(obj, keys) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|x| x != 0.0),
        Some(Value::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes"
        ),
        _ => false,
    }
}

fn resolve_text(obj: &Map<String, Value>, keys: &[&str]) -> String {
    match resolve(obj, keys) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn resolve_id(obj: &Map<String, Value>, keys: &[&str], idx: usize) -> SutureId {
    match resolve(obj, keys) {
        Some(Value::Number(n)) => match n.as_u64() {
            Some(id) => SutureId::Number(id),
            None => SutureId::Text(n.to_string()),
        },
        Some(Value::String(s)) => SutureId::Text(s.clone()),
        _ => SutureId::Number(idx as u64 + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn one(entry: Value) -> SutureObservation {
        let raw = json!({ "sutures": [entry] });
        observations_from_value(&raw).unwrap().remove(0)
    }

    #[test]
    fn strips_fences_anywhere() {
        let text = "```json\n{\"sutures\": []}\n```";
        assert_eq!(strip_code_fences(text), "{\"sutures\": []}");
        assert_eq!(strip_code_fences("  {}  "), "{}");
    }

    #[test]
    fn parses_fenced_snake_case_response() {
        let content = r#"```json
{"sutures": [
  {"id": 1, "position": "left", "far_point_distance_px": 93, "near_point_distance_px": 28, "is_abnormal": false, "abnormal_reason": ""},
  {"id": 2, "position": "center", "far_point_distance_px": 95.5, "near_point_distance_px": 32, "is_abnormal": true, "abnormal_reason": "blurred"}
]}
```"#;
        let m = parse_measurement(content).unwrap();
        assert_eq!(m.sutures.len(), 2);
        assert_eq!(m.sutures[0].far_point_distance_px, 93.0);
        assert_eq!(m.sutures[1].far_point_distance_px, 95.5);
        assert!(m.sutures[1].is_abnormal);
        assert_eq!(m.sutures[1].abnormal_reason, "blurred");
        assert_eq!(m.raw["sutures"][0]["position"], "left");
    }

    #[test]
    fn accepts_camel_case_and_alternate_names() {
        let o = one(json!({
            "group_id": 4,
            "location": "right",
            "farPointDistancePx": 101,
            "nearPointDistancePx": "30.5",
            "abnormal": true,
            "abnormal_reason_cn": "incomplete"
        }));
        assert_eq!(o.id, SutureId::Number(4));
        assert_eq!(o.position, "right");
        assert_eq!(o.far_point_distance_px, 101.0);
        assert_eq!(o.near_point_distance_px, 30.5);
        assert!(o.is_abnormal);
        assert_eq!(o.abnormal_reason, "incomplete");
    }

    #[test]
    fn snake_case_wins_over_camel_case() {
        let o = one(json!({
            "far_point_distance_px": 90,
            "farPointDistancePx": 120
        }));
        assert_eq!(o.far_point_distance_px, 90.0);
    }

    #[test]
    fn missing_or_non_numeric_distances_default() {
        let o = one(json!({ "far_point_distance_px": "n/a", "near_point_distance_px": null }));
        assert_eq!(o.far_point_distance_px, DEFAULT_DISTANCE_PX);
        assert_eq!(o.near_point_distance_px, DEFAULT_DISTANCE_PX);
        assert!(!o.is_abnormal);
        assert_eq!(o.abnormal_reason, "");
        assert_eq!(o.position, "");
    }

    #[test]
    fn null_snake_case_falls_through_to_camel_case() {
        let o = one(json!({ "near_point_distance_px": null, "nearPointDistancePx": 25 }));
        assert_eq!(o.near_point_distance_px, 25.0);
    }

    #[test]
    fn numeric_zero_is_kept() {
        let o = one(json!({
            "id": 0,
            "group_id": 7,
            "far_point_distance_px": 0,
            "nearPointDistancePx": "0"
        }));
        assert_eq!(o.id, SutureId::Number(0));
        assert_eq!(o.far_point_distance_px, 0.0);
        assert_eq!(o.near_point_distance_px, 0.0);
    }

    #[test]
    fn id_falls_back_to_position_in_list() {
        let raw = json!({ "sutures": [{}, {"id": "s-9"}, {}] });
        let obs = observations_from_value(&raw).unwrap();
        assert_eq!(obs[0].id, SutureId::Number(1));
        assert_eq!(obs[1].id, SutureId::Text("s-9".into()));
        assert_eq!(obs[2].id, SutureId::Number(3));
    }

    #[test]
    fn abnormal_flag_accepts_loose_forms() {
        assert!(one(json!({ "is_abnormal": "true" })).is_abnormal);
        assert!(one(json!({ "is_abnormal": 1 })).is_abnormal);
        assert!(!one(json!({ "is_abnormal": "false" })).is_abnormal);
        assert!(!one(json!({ "abnormal": 0 })).is_abnormal);
    }

    #[test]
    fn empty_content_is_an_error() {
        assert!(matches!(
            parse_measurement("   \n"),
            Err(EvalError::EmptyResponse)
        ));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            parse_measurement("the sutures look fine"),
            Err(EvalError::InvalidJson { .. })
        ));
    }

    #[test]
    fn missing_or_malformed_sutures_is_a_schema_error() {
        for content in [
            r#"{"result": []}"#,
            r#"{"sutures": {"id": 1}}"#,
            r#"[{"id": 1}]"#,
            r#"{"sutures": [1, 2]}"#,
        ] {
            assert!(
                matches!(parse_measurement(content), Err(EvalError::InvalidSchema { .. })),
                "{content}"
            );
        }
    }

    #[test]
    fn empty_sutures_list_parses() {
        let m = parse_measurement(r#"{"sutures": []}"#).unwrap();
        assert!(m.sutures.is_empty());
    }
}
