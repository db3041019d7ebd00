//! Recovery of edge property mappings from semi-malformed JSON strings.
//!
//! Strict JSON is tried first. On failure a fixed pipeline of textual repairs
//! runs once and the strict parse is retried. [`parse_properties`] never fails:
//! anything still unreadable becomes an empty mapping plus a warning.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::Attributes;
use crate::error::{GraphrouteError, Result};

/// Longest slice of an offending string echoed in diagnostics.
const PREVIEW_CHARS: usize = 200;

/// `{availability":` -> opening quote missing before the first key.
static MISSING_OPEN_QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\{\s*([A-Za-z_][^"{}:,\\]*)"\s*:"#).unwrap());

/// `{\condition":` -> stray backslash where the first key's quote belongs.
static STRAY_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\{\s*\\([A-Za-z_][^"{}:,\\]*)"\s*:"#).unwrap());

type Repair = fn(&str) -> String;

/// Applied in order, each to the previous step's output.
const REPAIRS: [Repair; 4] = [
    strip_unmatched_trailing_quote,
    unescape_quotes,
    insert_missing_open_quote,
    drop_stray_escape,
];

fn strip_unmatched_trailing_quote(s: &str) -> String {
    if s.ends_with('"') && !s.starts_with('"') {
        s[..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

fn unescape_quotes(s: &str) -> String {
    s.replace("\\\"", "\"")
}

fn insert_missing_open_quote(s: &str) -> String {
    MISSING_OPEN_QUOTE.replace(s, "{\"$1\":").into_owned()
}

fn drop_stray_escape(s: &str) -> String {
    STRAY_ESCAPE.replace(s, "{\"$1\":").into_owned()
}

fn is_empty_token(s: &str) -> bool {
    s.is_empty() || s == "{}"
}

fn strict_parse(s: &str) -> Result<Attributes> {
    match serde_json::from_str::<Value>(s) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(GraphrouteError::Parse(format!(
            "expected a mapping, found {}",
            json_kind(&other)
        ))),
        Err(e) => Err(GraphrouteError::Parse(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

/// Parse with repairs, reporting the failure instead of swallowing it.
///
/// Non-mapping JSON (numbers, lists, strings) is an error here rather than
/// being wrapped, so tolerant callers treat it like any unreadable input.
pub fn try_parse_properties(raw: &str) -> Result<Attributes> {
    let trimmed = raw.trim();
    if is_empty_token(trimmed) {
        return Ok(Attributes::new());
    }

    let first_error = match strict_parse(trimmed) {
        Ok(map) => return Ok(map),
        Err(e) => e,
    };

    let repaired = REPAIRS
        .iter()
        .fold(trimmed.to_string(), |acc, repair| repair(&acc));
    if repaired == trimmed {
        return Err(first_error);
    }
    if is_empty_token(&repaired) {
        return Ok(Attributes::new());
    }
    strict_parse(&repaired)
}

/// Parse an edge's serialized properties, degrading to an empty mapping.
///
/// `context` names the record in the warning emitted on failure.
pub fn parse_properties(raw: Option<&str>, context: &str) -> Attributes {
    let Some(raw) = raw else {
        return Attributes::new();
    };
    match try_parse_properties(raw) {
        Ok(map) => map,
        Err(e) => {
            log::warn!(
                "Unparseable properties for {} ({}): {}",
                context,
                e,
                preview(raw)
            );
            Attributes::new()
        }
    }
}

fn preview(raw: &str) -> String {
    let head: String = raw.chars().take(PREVIEW_CHARS).collect();
    head.replace('\r', "\\r").replace('\n', "\\n")
}
