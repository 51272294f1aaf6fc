//! Input model for reports produced by the external scoring service.
//!
//! Reports come in several schema generations. Everything here is built with
//! `from_value` constructors that accept any JSON and fall back to defaults, so
//! deserializing a report cannot fail once the body is valid JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::extract::FeedbackItem;
use super::lenient::{self, lookup};

/// A report as received, with document metadata already defaulted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawReport {
    pub pages_detected: u32,
    pub raw_text: String,
    /// `None` is the "no result" state.
    pub ai_feedback: Option<AiFeedback>,
}

/// The feedback section, discriminated by schema generation.
#[derive(Debug, Clone, PartialEq)]
pub enum AiFeedback {
    Flat(FlatFeedback),
    Categorized(CategorizedFeedback),
}

/// Fields shared by every generation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatFeedback {
    pub overall_score: Option<f64>,
    pub subscores: BTreeMap<String, f64>,
    pub score_scale: BTreeMap<String, f64>,
    pub summary: Option<String>,
    pub reasoning: Option<String>,
    pub strengths: Vec<FeedbackItem>,
    pub issues: Vec<FeedbackItem>,
    pub recommendations: Vec<FeedbackItem>,
    pub improved_bullets: Vec<FeedbackItem>,
    pub bad_bullets: Vec<FeedbackItem>,
}

/// The newest generation: flat fields plus per-category feedback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorizedFeedback {
    pub flat: FlatFeedback,
    /// Keyed by the raw category name; unknown names are kept here and dropped
    /// during normalization.
    pub by_category: BTreeMap<String, CategoryItems>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryItems {
    pub strengths: Vec<FeedbackItem>,
    pub issues: Vec<FeedbackItem>,
    pub recommendations: Vec<FeedbackItem>,
}

/// A report known to carry feedback; the only input `normalize` accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredReport {
    pub pages_detected: u32,
    pub raw_text: String,
    pub feedback: AiFeedback,
}

impl RawReport {
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return RawReport::default();
        };
        RawReport {
            pages_detected: lookup(obj, &["pages_detected", "pagesDetected"])
                .and_then(lenient::count)
                .unwrap_or(0),
            raw_text: lookup(obj, &["raw_text", "rawText"])
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            ai_feedback: lookup(obj, &["ai_feedback", "aiFeedback"])
                .and_then(Value::as_object)
                .map(AiFeedback::from_object),
        }
    }

    /// Splits off the feedback section. `None` means there is nothing to normalize.
    pub fn into_scored(self) -> Option<ScoredReport> {
        let feedback = self.ai_feedback?;
        Some(ScoredReport {
            pages_detected: self.pages_detected,
            raw_text: self.raw_text,
            feedback,
        })
    }
}

impl<'de> Deserialize<'de> for RawReport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(RawReport::from_value(&value))
    }
}

impl AiFeedback {
    /// Returns `None` unless `value` is a JSON object.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(AiFeedback::from_object)
    }

    fn from_object(obj: &Map<String, Value>) -> Self {
        let flat = FlatFeedback::from_object(obj);
        let categories = lookup(obj, &["feedback_by_category", "feedbackByCategory"])
            .and_then(Value::as_object);
        match categories {
            Some(categories) => AiFeedback::Categorized(CategorizedFeedback {
                flat,
                by_category: categories
                    .iter()
                    .map(|(key, v)| (key.clone(), CategoryItems::from_value(v)))
                    .collect(),
            }),
            None => AiFeedback::Flat(flat),
        }
    }

    pub fn flat(&self) -> &FlatFeedback {
        match self {
            AiFeedback::Flat(flat) => flat,
            AiFeedback::Categorized(categorized) => &categorized.flat,
        }
    }

    pub fn flat_mut(&mut self) -> &mut FlatFeedback {
        match self {
            AiFeedback::Flat(flat) => flat,
            AiFeedback::Categorized(categorized) => &mut categorized.flat,
        }
    }
}

impl FlatFeedback {
    fn from_object(obj: &Map<String, Value>) -> Self {
        FlatFeedback {
            overall_score: lookup(obj, &["overall_score", "overallScore"])
                .and_then(lenient::number),
            subscores: lenient::score_map(lookup(obj, &["subscores", "scores"])),
            score_scale: lenient::score_map(lookup(obj, &["score_scale", "scoreScale"])),
            summary: lookup(obj, &["summary"]).and_then(lenient::text),
            reasoning: lookup(obj, &["reasoning"]).and_then(lenient::text),
            strengths: lenient::items(lookup(obj, &["strengths"])),
            issues: lenient::items(lookup(obj, &["issues"])),
            recommendations: lenient::items(lookup(obj, &["recommendations"])),
            improved_bullets: lenient::items(lookup(
                obj,
                &["improved_bullets", "improvedBullets"],
            )),
            bad_bullets: lenient::items(lookup(obj, &["bad_bullets", "badBullets"])),
        }
    }
}

impl CategoryItems {
    fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return CategoryItems::default();
        };
        CategoryItems {
            strengths: lenient::items(lookup(obj, &["strengths"])),
            issues: lenient::items(lookup(obj, &["issues"])),
            recommendations: lenient::items(lookup(obj, &["recommendations"])),
        }
    }
}
