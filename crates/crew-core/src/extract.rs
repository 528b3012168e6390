//! Best-effort structured extraction from free-text model replies.
//!
//! Everything Claude says passes through here before the rest of the crate
//! sees it: find one JSON object, then read named fields with explicit
//! defaults. Nothing downstream handles raw reply text.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

fn object_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("static regex"))
}

/// The reply itself if it is a JSON object, otherwise the span from the
/// first `{` to the last `}` if that parses as one.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    let trimmed = text.trim();
    if let Ok(Value::Object(map)) = serde_json::from_str(trimmed) {
        return Some(map);
    }
    let span = object_re().find(trimmed)?;
    match serde_json::from_str(span.as_str()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// First non-empty string under any of `keys`, trimmed.
pub fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .filter_map(|v| match v {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .find(|s| !s.is_empty())
}

/// A 0–100 percentage under any of `keys`; numbers or numeric strings,
/// rounded and clamped. Missing or unusable values are 0.
pub fn percent_field(obj: &Map<String, Value>, keys: &[&str]) -> u8 {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find_map(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
            _ => None,
        })
        .filter(|f| f.is_finite())
        .map(|f| f.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0)
}
