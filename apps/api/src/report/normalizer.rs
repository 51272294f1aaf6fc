//! Schema Normalizer: reconciles every report generation into one `AnalysisView`.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::band::{classify, percent, Band};
use super::catalog::{CategoryKey, CATALOG};
use super::extract::extract_all;
use super::raw::{AiFeedback, CategoryItems, FlatFeedback, RawReport, ScoredReport};

pub const SUMMARY_FALLBACK: &str = "No summary was provided for this analysis.";
const OVERALL_MAX: f64 = 100.0;

/// Canonical, fully-defaulted view of one analysed document.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnalysisView {
    pub overall_score: f64,
    pub overall_band: Band,
    pub pages_detected: u32,
    pub raw_text: String,
    pub summary_text: String,
    /// One entry per catalog category, in catalog order.
    pub category_scores: Vec<CategoryScore>,
    pub category_feedback: CategoryFeedback,
    pub improved_bullets: Vec<String>,
    pub bad_bullets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryScore {
    pub key: CategoryKey,
    pub label: &'static str,
    pub value: f64,
    pub max: f64,
    pub percent: f64,
    pub band: Band,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackMode {
    Categorized,
    Flat,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct FeedbackLists {
    pub strengths: Vec<String>,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

impl FeedbackLists {
    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty() && self.issues.is_empty() && self.recommendations.is_empty()
    }

    fn from_items(items: &CategoryItems) -> Self {
        FeedbackLists {
            strengths: extract_all(&items.strengths),
            issues: extract_all(&items.issues),
            recommendations: extract_all(&items.recommendations),
        }
    }

    fn from_flat(flat: &FlatFeedback) -> Self {
        FeedbackLists {
            strengths: extract_all(&flat.strengths),
            issues: extract_all(&flat.issues),
            recommendations: extract_all(&flat.recommendations),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryFeedback {
    pub mode: FeedbackMode,
    /// Always holds every catalog key.
    pub by_category: BTreeMap<CategoryKey, FeedbackLists>,
    /// Flat-generation feedback that belongs to no single category.
    pub general: FeedbackLists,
    /// Categories with any feedback content, in catalog order. These are the
    /// sections a presentation layer renders and registers for scrolling.
    pub navigable: Vec<CategoryKey>,
}

impl CategoryFeedback {
    fn new(
        mode: FeedbackMode,
        by_category: BTreeMap<CategoryKey, FeedbackLists>,
        general: FeedbackLists,
    ) -> Self {
        let navigable = by_category
            .iter()
            .filter(|(_, lists)| !lists.is_empty())
            .map(|(key, _)| *key)
            .collect();
        CategoryFeedback {
            mode,
            by_category,
            general,
            navigable,
        }
    }
}

/// Normalizes a report, or returns `None` for the "no result" state.
pub fn normalize_report(report: RawReport) -> Option<AnalysisView> {
    report.into_scored().map(normalize)
}

/// Builds the canonical view. Total: malformed or missing fields become defaults.
pub fn normalize(report: ScoredReport) -> AnalysisView {
    let ScoredReport {
        pages_detected,
        raw_text,
        feedback,
    } = report;
    let flat = feedback.flat();

    let overall_score = flat.overall_score.unwrap_or(0.0);
    let category_scores = score_categories(flat);
    let category_feedback = reconcile_feedback(&feedback);

    debug!(
        overall_score,
        mode = ?category_feedback.mode,
        navigable = category_feedback.navigable.len(),
        "normalized analysis report"
    );

    AnalysisView {
        overall_score,
        overall_band: classify(overall_score, OVERALL_MAX),
        pages_detected,
        raw_text,
        summary_text: flat
            .summary
            .clone()
            .or_else(|| flat.reasoning.clone())
            .unwrap_or_else(|| SUMMARY_FALLBACK.to_string()),
        category_scores,
        category_feedback,
        improved_bullets: extract_all(&flat.improved_bullets),
        bad_bullets: extract_all(&flat.bad_bullets),
    }
}

fn score_categories(flat: &FlatFeedback) -> Vec<CategoryScore> {
    CATALOG
        .iter()
        .map(|category| {
            let key = category.key.as_str();
            let value = flat.subscores.get(key).copied().unwrap_or(0.0);
            let max = flat
                .score_scale
                .get(key)
                .copied()
                .unwrap_or(category.max_score);
            CategoryScore {
                key: category.key,
                label: category.label,
                value,
                max,
                percent: percent(value, max),
                band: classify(value, max),
                color: category.color,
            }
        })
        .collect()
}

fn reconcile_feedback(feedback: &AiFeedback) -> CategoryFeedback {
    match feedback {
        AiFeedback::Categorized(categorized) => CategoryFeedback::new(
            FeedbackMode::Categorized,
            CATALOG
                .iter()
                .map(|category| {
                    let lists = categorized
                        .by_category
                        .get(category.key.as_str())
                        .map(FeedbackLists::from_items)
                        .unwrap_or_default();
                    (category.key, lists)
                })
                .collect(),
            FeedbackLists::default(),
        ),
        AiFeedback::Flat(flat) => CategoryFeedback::new(
            FeedbackMode::Flat,
            CATALOG
                .iter()
                .map(|category| (category.key, FeedbackLists::default()))
                .collect(),
            FeedbackLists::from_flat(flat),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    impl AnalysisView {
        fn score(&self, key: CategoryKey) -> Option<&CategoryScore> {
            self.category_scores.iter().find(|s| s.key == key)
        }

        fn feedback_for(&self, key: CategoryKey) -> Option<&FeedbackLists> {
            self.category_feedback.by_category.get(&key)
        }
    }

    fn view(value: Value) -> AnalysisView {
        normalize_report(RawReport::from_value(&value)).expect("report has feedback")
    }

    #[test]
    fn test_no_feedback_is_no_result() {
        let report = RawReport::from_value(&json!({"pages_detected": 1}));
        assert!(normalize_report(report).is_none());
    }

    #[test]
    fn test_flat_scores_use_reported_scale() {
        let v = view(json!({
            "ai_feedback": {
                "subscores": {"structure": 18},
                "score_scale": {"structure": 20}
            }
        }));
        let structure = v.score(CategoryKey::Structure).unwrap();
        assert_eq!(structure.value, 18.0);
        assert_eq!(structure.max, 20.0);
        assert_eq!(structure.band, Band::Strong);
        assert!((structure.percent - 90.0).abs() < 1e-9);
        assert_eq!(structure.label, "Structure");
    }

    #[test]
    fn test_missing_scale_uses_catalog_max() {
        let v = view(json!({"ai_feedback": {"subscores": {"impact": 15}}}));
        let impact = v.score(CategoryKey::Impact).unwrap();
        assert_eq!(impact.max, 25.0);
        assert_eq!(impact.band, Band::Moderate);
    }

    #[test]
    fn test_missing_subscore_defaults_to_zero() {
        let v = view(json!({"ai_feedback": {}}));
        assert_eq!(v.category_scores.len(), 5);
        for score in &v.category_scores {
            assert_eq!(score.value, 0.0);
            assert_eq!(score.band, Band::Weak);
        }
        assert_eq!(v.overall_score, 0.0);
        assert_eq!(v.overall_band, Band::Weak);
    }

    #[test]
    fn test_scores_follow_catalog_order() {
        let v = view(json!({
            "ai_feedback": {
                "subscores": {
                    "ats": 1,
                    "clarity": 2,
                    "impact": 3,
                    "technical_depth": 4,
                    "structure": 5
                }
            }
        }));
        let keys: Vec<&str> = v.category_scores.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["structure", "technical_depth", "impact", "clarity", "ats"]);
    }

    #[test]
    fn test_unknown_subscores_ignored() {
        let v = view(json!({"ai_feedback": {"subscores": {"bullets": 10, "ats": 12}}}));
        assert_eq!(v.category_scores.len(), 5);
        assert_eq!(v.score(CategoryKey::Ats).unwrap().value, 12.0);
    }

    #[test]
    fn test_overall_score_banded_out_of_hundred() {
        let v = view(json!({"ai_feedback": {"overall_score": 82}}));
        assert_eq!(v.overall_score, 82.0);
        assert_eq!(v.overall_band, Band::Strong);
    }

    #[test]
    fn test_categorized_feedback() {
        let v = view(json!({
            "ai_feedback": {
                "feedback_by_category": {"impact": {"issues": ["slow"]}}
            }
        }));
        assert_eq!(v.category_feedback.mode, FeedbackMode::Categorized);
        assert_eq!(v.feedback_for(CategoryKey::Impact).unwrap().issues, vec!["slow"]);
        assert!(v.category_feedback.general.is_empty());
        assert!(v.feedback_for(CategoryKey::Ats).unwrap().is_empty());
        assert_eq!(v.category_feedback.by_category.len(), 5);
        assert_eq!(v.category_feedback.navigable, vec![CategoryKey::Impact]);
    }

    #[test]
    fn test_categorized_ignores_flat_lists_and_unknown_categories() {
        let v = view(json!({
            "ai_feedback": {
                "issues": ["flat issue"],
                "feedback_by_category": {
                    "leadership": {"strengths": ["led team"]},
                    "clarity": {"strengths": [{"text": "concise"}]}
                }
            }
        }));
        assert!(v.category_feedback.general.is_empty());
        assert_eq!(v.category_feedback.navigable, vec![CategoryKey::Clarity]);
        assert_eq!(
            v.feedback_for(CategoryKey::Clarity).unwrap().strengths,
            vec!["concise"]
        );
    }

    #[test]
    fn test_flat_feedback_goes_to_general_bucket() {
        let v = view(json!({
            "ai_feedback": {
                "strengths": ["clear layout"],
                "issues": [{"message": "no metrics"}],
                "recommendations": ["add numbers"]
            }
        }));
        assert_eq!(v.category_feedback.mode, FeedbackMode::Flat);
        let general = &v.category_feedback.general;
        assert_eq!(general.strengths, vec!["clear layout"]);
        assert_eq!(general.issues, vec!["no metrics"]);
        assert_eq!(general.recommendations, vec!["add numbers"]);
        assert!(v.category_feedback.navigable.is_empty());
        assert_eq!(v.category_feedback.by_category.len(), 5);
    }

    #[test]
    fn test_improved_bullets_always_from_flat_field() {
        let v = view(json!({
            "ai_feedback": {
                "improved_bullets": [
                    {"improved_bullet": "Cut latency 40%", "bad_bullet": "Made it fast"}
                ],
                "bad_bullets": ["Made it fast"],
                "feedback_by_category": {}
            }
        }));
        assert_eq!(v.improved_bullets, vec!["Cut latency 40%"]);
        assert_eq!(v.bad_bullets, vec!["Made it fast"]);
    }

    #[test]
    fn test_summary_resolution() {
        let v = view(json!({"ai_feedback": {"summary": "Solid", "reasoning": "Because"}}));
        assert_eq!(v.summary_text, "Solid");
        let v = view(json!({"ai_feedback": {"reasoning": "Because"}}));
        assert_eq!(v.summary_text, "Because");
        let v = view(json!({"ai_feedback": {"summary": "  "}}));
        assert_eq!(v.summary_text, SUMMARY_FALLBACK);
    }

    #[test]
    fn test_metadata_passthrough() {
        let v = view(json!({"pages_detected": 2, "raw_text": "Jane Doe", "ai_feedback": {}}));
        assert_eq!(v.pages_detected, 2);
        assert_eq!(v.raw_text, "Jane Doe");
        let v = view(json!({"ai_feedback": {}}));
        assert_eq!(v.pages_detected, 0);
        assert_eq!(v.raw_text, "");
    }

    #[test]
    fn test_zero_scale_does_not_fail() {
        let v = view(json!({
            "ai_feedback": {"subscores": {"clarity": 10}, "score_scale": {"clarity": 0}}
        }));
        assert_eq!(v.score(CategoryKey::Clarity).unwrap().band, Band::Weak);
    }

    #[test]
    fn test_serialized_shape() {
        let v = view(json!({"ai_feedback": {"subscores": {"structure": 18}}}));
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["category_scores"][0]["key"], "structure");
        assert_eq!(json["category_scores"][0]["band"], "strong");
        assert_eq!(json["category_feedback"]["mode"], "flat");
        assert!(json["category_feedback"]["by_category"]["technical_depth"].is_object());
        assert_eq!(json["category_feedback"]["navigable"], json!([]));
    }

    #[test]
    fn test_navigable_keys_serialized_in_catalog_order() {
        let v = view(json!({
            "ai_feedback": {
                "feedback_by_category": {
                    "ats": {"issues": ["no keywords"]},
                    "structure": {"strengths": ["clean sections"]},
                    "impact": {"strengths": [], "issues": [], "recommendations": []}
                }
            }
        }));
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["category_feedback"]["navigable"], json!(["structure", "ats"]));
    }
}
