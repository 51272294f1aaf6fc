//! Turns raw language-model output into report feedback.
//!
//! Scoring models routinely wrap JSON in code fences, leave trailing commas,
//! emit unquoted bullet lines, misspell keys, or stop before closing every
//! bracket. Ingestion repairs what it can and otherwise substitutes a fixed
//! failure report, so it never fails.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;
use tracing::{debug, warn};

use super::catalog::CATALOG;
use super::extract::FeedbackItem;
use super::raw::{AiFeedback, FlatFeedback, RawReport};

pub const FAILURE_SUMMARY: &str = "AI failed to produce valid JSON";

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").expect("valid regex"));
static BULLET_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n\r]\s*[•\-]\s*(.+)").expect("valid regex"));

/// Misspelled keys seen in model output, with their correct names.
const KEY_REPAIRS: &[(&str, &str)] = &[
    ("Estructure", "structure"),
    ("Technical_depth", "technical_depth"),
    ("Impact", "impact"),
    ("Cliquarity", "clarity"),
    ("ATS_relevance", "ats"),
    ("sory", "summary"),
];

/// Builds a report from model output plus the document metadata it describes.
pub fn ingest_model_output(output: &str, pages_detected: u32, raw_text: String) -> RawReport {
    RawReport {
        pages_detected,
        raw_text,
        ai_feedback: Some(parse_model_output(output)),
    }
}

/// Repairs and parses model output. Unparseable output yields the failure report.
pub fn parse_model_output(output: &str) -> AiFeedback {
    let repaired = repair_json(output);
    let value = match serde_json::from_str::<Value>(&repaired) {
        Ok(value) => value,
        Err(e) => {
            warn!("Model output is not valid JSON after repair: {e}");
            return failure_feedback(&e.to_string());
        }
    };
    let Some(mut feedback) = AiFeedback::from_value(&value) else {
        warn!("Model output parsed but is not a JSON object");
        return failure_feedback("model output is not a JSON object");
    };
    reconcile_overall_score(feedback.flat_mut());
    feedback
}

/// Replaces the overall score with the sum of the catalog subscores when they disagree.
/// Leaves reports without any catalog subscore untouched.
pub fn reconcile_overall_score(flat: &mut FlatFeedback) {
    let present: Vec<f64> = CATALOG
        .iter()
        .filter_map(|c| flat.subscores.get(c.key.as_str()).copied())
        .collect();
    if present.is_empty() {
        return;
    }
    let calculated: f64 = present.iter().sum();
    let reported = flat.overall_score.unwrap_or(0.0);
    if (calculated - reported).abs() > f64::EPSILON {
        warn!(
            reported,
            calculated, "Overall score disagrees with subscores, using their sum"
        );
        flat.overall_score = Some(calculated);
    }
}

/// The fixed report shown when the model output cannot be used.
pub fn failure_feedback(reason: &str) -> AiFeedback {
    AiFeedback::Flat(FlatFeedback {
        overall_score: Some(0.0),
        score_scale: CATALOG
            .iter()
            .map(|c| (c.key.as_str().to_string(), c.max_score))
            .collect(),
        summary: Some(FAILURE_SUMMARY.to_string()),
        reasoning: Some(reason.to_string()),
        issues: vec![FeedbackItem::from("AI engine returned malformed output")],
        recommendations: vec![
            FeedbackItem::from("Try again"),
            FeedbackItem::from("Reduce resume length"),
            FeedbackItem::from("Simplify formatting"),
        ],
        ..FlatFeedback::default()
    })
}

/// Applies every textual repair, in an order where later steps clean up after earlier ones.
pub fn repair_json(raw: &str) -> String {
    let text = strip_json_fences(raw);
    let text = quote_bullet_lines(text);
    let text = repair_keys(&text);
    let text = TRAILING_COMMA.replace_all(&text, "$1").into_owned();
    let repaired = close_unbalanced(&text);
    if repaired != raw.trim() {
        debug!("Repaired model output ({} -> {} bytes)", raw.len(), repaired.len());
    }
    repaired
}

/// Strips ```json ... ``` or ``` ... ``` code fences.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .trim_end()
                .strip_suffix("```")
                .map(str::trim)
                .unwrap_or(stripped)
        }
        None => text,
    }
}

/// Turns `- item` / `• item` lines into quoted array elements.
fn quote_bullet_lines(text: &str) -> String {
    BULLET_LINE
        .replace_all(text, |caps: &Captures| {
            let content = caps[1].trim().trim_end_matches(',').replace('"', "\\\"");
            format!("\n    \"{content}\",")
        })
        .into_owned()
}

fn repair_keys(text: &str) -> String {
    KEY_REPAIRS.iter().fold(text.to_string(), |acc, (wrong, right)| {
        let pattern = format!(r#""{}"(\s*:)"#, regex::escape(wrong));
        match Regex::new(&pattern) {
            Ok(re) => re
                .replace_all(&acc, format!("\"{right}\"$1").as_str())
                .into_owned(),
            Err(_) => acc,
        }
    })
}

/// Appends closers for every bracket or brace left open, innermost first.
/// Brackets inside string literals are ignored; an unterminated string is closed.
fn close_unbalanced(text: &str) -> String {
    let mut open = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => open.push('}'),
            '[' => open.push(']'),
            '}' | ']' => {
                if open.last() == Some(&c) {
                    open.pop();
                }
            }
            _ => {}
        }
    }

    let mut out = text.to_string();
    if in_string {
        out.push('"');
    }
    out.extend(open.into_iter().rev());
    out
}
