use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Keys looked up on structured items, highest priority first. Each entry lists the
/// snake_case spelling the scoring backend emits and its camelCase alias.
const TEXT_KEYS: &[&[&str]] = &[
    &["improved_bullet", "improvedBullet"],
    &["bad_bullet", "badBullet"],
    &["text"],
    &["content"],
    &["message"],
];

/// One strength, issue, recommendation or bullet as it appears in a report.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackItem {
    PlainText(String),
    Structured(Map<String, Value>),
    /// Null, numbers, booleans or nested arrays.
    Other(Value),
}

impl FeedbackItem {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => FeedbackItem::PlainText(s.clone()),
            Value::Object(map) => FeedbackItem::Structured(map.clone()),
            other => FeedbackItem::Other(other.clone()),
        }
    }

    /// The display string for this item. Never fails and never drops content:
    /// structured items with no recognised text key render as their JSON form.
    pub fn extract(&self) -> String {
        match self {
            FeedbackItem::PlainText(s) => s.clone(),
            FeedbackItem::Structured(map) => TEXT_KEYS
                .iter()
                .find_map(|names| names.iter().find_map(|name| field_text(map.get(*name)?)))
                .unwrap_or_else(|| Value::Object(map.clone()).to_string()),
            FeedbackItem::Other(Value::Null) => String::new(),
            FeedbackItem::Other(Value::String(s)) => s.clone(),
            FeedbackItem::Other(other) => other.to_string(),
        }
    }
}

impl From<&str> for FeedbackItem {
    fn from(s: &str) -> Self {
        FeedbackItem::PlainText(s.to_string())
    }
}

impl<'de> Deserialize<'de> for FeedbackItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(FeedbackItem::from_value(&value))
    }
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extracts every item in order.
pub fn extract_all(items: &[FeedbackItem]) -> Vec<String> {
    items.iter().map(FeedbackItem::extract).collect()
}
