//! Coercions from loosely-typed JSON into the defaults the report model expects.
//!
//! Nothing here returns an error: a value of the wrong shape is treated as absent.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::extract::FeedbackItem;

/// Returns the first non-null value stored under any of `names`.
pub fn lookup<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| obj.get(*name))
        .find(|v| !v.is_null())
}

/// JSON number or numeric string.
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Non-negative whole count; fractional and negative values degrade to `None`.
pub fn count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| whole(n.as_f64()?))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// Whole, non-negative float within `u32` range.
fn whole(n: f64) -> Option<u64> {
    (n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64).then_some(n as u64)
}

/// Non-blank string.
pub fn text(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// A list of feedback items. A lone item that is not wrapped in an array is
/// kept as a one-element list.
pub fn items(value: Option<&Value>) -> Vec<FeedbackItem> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(values)) => values.iter().map(FeedbackItem::from_value).collect(),
        Some(other) => vec![FeedbackItem::from_value(other)],
    }
}

/// An object of `name -> number`, silently skipping non-numeric entries.
pub fn score_map(value: Option<&Value>) -> BTreeMap<String, f64> {
    value
        .and_then(Value::as_object)
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| number(v).map(|n| (k.clone(), n)))
                .collect()
        })
        .unwrap_or_default()
}
