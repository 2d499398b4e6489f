//! Field parsers for loosely typed aggregate rows.
//!
//! Upstream files are produced by scripts that are not strict about JSON types: numbers can
//! arrive as strings and ids as numbers. Each parser returns `None` when the value cannot be
//! coerced, and the caller decides whether that drops the record or falls back to a default.

use chrono::NaiveDate;
use serde_json::{Map, Value};

pub(crate) type Row = Map<String, Value>;

/// Non-empty trimmed text. Numbers are accepted and rendered as text (ids like `98210`).
pub(crate) fn parse_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Finite float from a JSON number or a numeric string such as `"12.5"`.
pub(crate) fn parse_f64(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    parsed.is_finite().then_some(parsed)
}

/// Integer from a JSON integer, a float (truncated toward zero) or an integer string.
pub(crate) fn parse_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(i),
            None => {
                let f = n.as_f64()?;
                (f.is_finite() && f.abs() < i64::MAX as f64).then(|| f.trunc() as i64)
            }
        },
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

pub(crate) fn parse_i32(value: Option<&Value>) -> Option<i32> {
    parse_i64(value).and_then(|i| i32::try_from(i).ok())
}

pub(crate) fn parse_month(value: Option<&Value>) -> Option<u32> {
    parse_i64(value)
        .and_then(|i| u32::try_from(i).ok())
        .filter(|m| (1..=12).contains(m))
}

/// Non-negative count. Absent fields are the caller's concern; a present but negative or
/// non-numeric value yields `None`.
pub(crate) fn parse_count(value: Option<&Value>) -> Option<u32> {
    parse_i64(value).and_then(|i| u32::try_from(i).ok())
}

/// Calendar date in `YYYY-MM-DD` form.
pub(crate) fn parse_date(value: Option<&Value>) -> Option<NaiveDate> {
    match value? {
        Value::String(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
        _ => None,
    }
}

pub(crate) fn parse_bool(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        _ => None,
    }
}

/// Applies `parse` to an optional field: absent or null gives `Some(default)`, present but
/// unparseable gives `None`.
pub(crate) fn parse_or<T, F>(value: Option<&Value>, default: T, parse: F) -> Option<T>
where
    F: FnOnce(Option<&Value>) -> Option<T>,
{
    match value {
        None | Some(Value::Null) => Some(default),
        present => parse(present),
    }
}
