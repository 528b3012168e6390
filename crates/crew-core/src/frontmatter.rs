//! Tolerant frontmatter parsing for Claude agent and skill markdown.
//!
//! Agent descriptions are natural language and routinely contain `:` or
//! `<example>` tags that break strict YAML. Parsing therefore runs in two
//! stages: `serde_yaml` over a lightly repaired header, then a line-oriented
//! fallback that accepts almost anything shaped like `key: value`. Neither
//! stage can fail the caller; the worst case is an empty header.

use regex::Regex;
use serde_yaml::{Mapping, Number, Value};
use std::sync::OnceLock;

const DELIMITER: &str = "---";

/// A markdown file split into its header mapping and body text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub header: Mapping,
    pub body: String,
}

/// Split `text` into frontmatter and body.
///
/// Text without an opening `---` line, or without a closing one, comes back
/// unchanged as the body with an empty header.
pub fn parse(text: &str) -> Document {
    let Some((header_src, body)) = split(text) else {
        return Document {
            header: Mapping::new(),
            body: text.to_string(),
        };
    };

    let header = match parse_yaml(header_src) {
        Ok(map) => map,
        Err(e) => {
            tracing::debug!(error = %e, "frontmatter is not valid YAML; using line parser");
            parse_fallback(header_src)
        }
    };

    Document {
        header,
        body: body.trim().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Delimiters
// ---------------------------------------------------------------------------

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches('\n').trim_end_matches('\r') == DELIMITER
}

/// Locate the header between the opening and closing `---` lines.
/// Returns `(header, body)` slices of `text`.
fn split(text: &str) -> Option<(&str, &str)> {
    let mut lines = text.split_inclusive('\n');
    let first = lines.next()?;
    if !is_delimiter(first) || !first.ends_with('\n') {
        return None;
    }

    let header_start = first.len();
    let mut offset = header_start;
    for line in lines {
        if is_delimiter(line) {
            let header = text[header_start..offset]
                .strip_suffix('\n')
                .map(|h| h.strip_suffix('\r').unwrap_or(h))
                .unwrap_or("");
            let body = &text[offset + line.len()..];
            return Some((header, body));
        }
        offset += line.len();
    }
    None
}

// ---------------------------------------------------------------------------
// Primary: serde_yaml over a repaired header
// ---------------------------------------------------------------------------

fn description_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^description:[ \t]*(.*?)[ \t\r]*$").expect("static regex"))
}

/// Double-quote an unquoted `description:` value containing `:`, `<`, or `>`.
pub(crate) fn quote_descriptions(header: &str) -> String {
    header
        .lines()
        .map(|line| {
            let Some(caps) = description_re().captures(line) else {
                return line.to_string();
            };
            let value = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let already_safe = value.is_empty()
                || value.starts_with('"')
                || value.starts_with('\'')
                || is_block_marker(value);
            if already_safe || !value.contains([':', '<', '>']) {
                return line.to_string();
            }
            let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
            format!("description: \"{escaped}\"")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_yaml(header: &str) -> Result<Mapping, serde_yaml::Error> {
    let prepared = quote_descriptions(header);
    if prepared.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(&prepared)? {
        Value::Mapping(map) => Ok(map),
        _ => Ok(Mapping::new()),
    }
}

// ---------------------------------------------------------------------------
// Fallback: line-oriented key/value parser
// ---------------------------------------------------------------------------

fn key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z0-9_][A-Za-z0-9_.\-]*):[ \t]*(.*)$").expect("static regex"))
}

fn is_block_marker(value: &str) -> bool {
    let v = value.trim();
    matches!(v, "|" | "|-" | "|+" | ">" | ">-" | ">+")
}

/// Parse `key: value` lines. Non-indented keys start a field; every other
/// line is appended to the current field.
pub(crate) fn parse_fallback(header: &str) -> Mapping {
    let mut fields: Vec<(String, String, Vec<String>)> = Vec::new();

    for raw in header.lines() {
        let line = raw.trim_end_matches('\r');
        if let Some(caps) = key_re().captures(line) {
            let key = caps[1].to_string();
            let value = caps.get(2).map(|m| m.as_str()).unwrap_or("").to_string();
            fields.push((key, value, Vec::new()));
        } else if let Some((_, _, continuation)) = fields.last_mut() {
            continuation.push(line.to_string());
        }
    }

    let mut map = Mapping::new();
    for (key, first, continuation) in fields {
        map.insert(Value::String(key), field_value(&first, &continuation));
    }
    map
}

fn field_value(first: &str, continuation: &[String]) -> Value {
    if is_block_marker(first) {
        let text = continuation
            .iter()
            .map(|l| l.trim_start())
            .collect::<Vec<_>>()
            .join("\n");
        return Value::String(text.trim_end().to_string());
    }

    if first.trim().is_empty() {
        if let Some(items) = list_items(continuation) {
            return Value::Sequence(items.into_iter().map(|i| coerce_scalar(&i)).collect());
        }
    }

    let mut joined = first.to_string();
    for line in continuation {
        joined.push('\n');
        joined.push_str(line);
    }
    coerce_scalar(joined.trim())
}

/// `- item` continuation lines under an empty key become a sequence.
fn list_items(lines: &[String]) -> Option<Vec<String>> {
    let non_blank: Vec<&str> = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();
    if non_blank.is_empty() {
        return None;
    }
    non_blank
        .iter()
        .map(|l| {
            l.strip_prefix("- ")
                .or_else(|| (*l == "-").then_some(""))
                .map(|i| i.trim().to_string())
        })
        .collect()
}

/// Strip matching quotes, then recognise booleans, null, and numbers.
pub(crate) fn coerce_scalar(raw: &str) -> Value {
    let s = raw.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        return Value::String(s[1..s.len() - 1].to_string());
    }
    match s {
        "" | "null" | "~" => return Value::Null,
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Number(Number::from(i));
    }
    if looks_numeric(s) {
        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() {
                return Value::Number(Number::from(f));
            }
        }
    }
    Value::String(s.to_string())
}

/// `f64::from_str` also accepts `inf`/`NaN`; only digit-bearing text counts.
fn looks_numeric(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
        && s
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
}

// ---------------------------------------------------------------------------
// Header accessors
// ---------------------------------------------------------------------------

/// A header value rendered as text. Null and missing keys are `None`.
pub fn header_str(header: &Mapping, key: &str) -> Option<String> {
    match header.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Sequence(items) => Some(
            items
                .iter()
                .filter_map(scalar_text)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        _ => None,
    }
}

/// A header value that may be a comma-separated string or a YAML list.
pub fn header_list(header: &Mapping, key: &str) -> Vec<String> {
    match header.get(key) {
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(scalar_text)
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
