use serde_json::{Map, Value};

/// Direct overlay image URL on an inspection event, newest name first.
pub const OVERLAY_URL_FIELDS: &[&str] = &["overlay_url", "image_overlay_url"];

/// Resolved URL on a presign response.
pub const PRESIGNED_URL_FIELDS: &[&str] = &["url", "overlay_url"];

/// Resolves the first candidate field holding a non-empty textual value.
///
/// Candidates are tried in order, so earlier names take precedence over their
/// synonyms. Empty strings, nulls and non-scalar values are skipped and the
/// lookup moves on to the next candidate.
pub fn first_text(object: &Map<String, Value>, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .find_map(|key| object.get(*key).and_then(scalar_text))
}

pub fn text(object: &Map<String, Value>, key: &str) -> Option<String> {
    first_text(object, &[key])
}

pub fn integer(object: &Map<String, Value>, key: &str) -> Option<i64> {
    match object.get(key)? {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(whole_f64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Whole floats inside the `i64` range; anything else is not a count.
fn whole_f64(value: f64) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    (value.fract() == 0.0 && (-LIMIT..LIMIT).contains(&value)).then_some(value as i64)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
