use serde::{Deserialize, Serialize};

/// Qualitative classification of a score against its maximum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Strong,
    Moderate,
    Weak,
}

const STRONG_RATIO: f64 = 0.8;
const MODERATE_RATIO: f64 = 0.6;

/// Percentage of `max` reached by `value`. A zero maximum counts as 0%.
pub fn percent(value: f64, max: f64) -> f64 {
    ratio(value, max) * 100.0
}

/// Classifies `value` out of `max`: ≥80% strong, ≥60% moderate, otherwise weak.
///
/// Thresholds are compared on the ratio rather than the percentage so that exact
/// fractions such as 12/15 land on the boundary instead of a rounding error below it.
pub fn classify(value: f64, max: f64) -> Band {
    match ratio(value, max) {
        r if r >= STRONG_RATIO => Band::Strong,
        r if r >= MODERATE_RATIO => Band::Moderate,
        _ => Band::Weak,
    }
}

fn ratio(value: f64, max: f64) -> f64 {
    if max == 0.0 {
        return 0.0;
    }
    let r = value / max;
    if r.is_nan() {
        0.0
    } else {
        r
    }
}
