//! Loose request-field coercion shared by the content and image endpoints.
//!
//! The frontend sends counts as numbers or numeric strings; both are accepted.
//! Text fields of the wrong JSON type never fail the whole body.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// For optional descriptive fields (tone, style, role...). Strings pass
/// through, numbers and booleans are stringified, anything else reads as absent.
pub fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// For required text fields: only a JSON string counts, so a wrong type ends
/// up as the field's "is required" error instead of a body rejection.
pub fn string_only<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Reads a count the way the web client expects: numbers and numeric strings
/// are honoured, anything unusable (or zero) falls back to `fallback`, and the
/// result is clamped to `[min, max]`.
pub fn clamp_count(value: Option<&Value>, fallback: u32, min: u32, max: u32) -> u32 {
    let requested = value
        .and_then(numeric)
        .filter(|n| n.is_finite() && *n != 0.0)
        .unwrap_or(f64::from(fallback));
    requested.clamp(f64::from(min), f64::from(max)).trunc() as u32
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Some(0.0)
            } else {
                s.parse().ok()
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}
