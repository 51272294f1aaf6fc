use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stable key of one scoring dimension.
///
/// Declaration order is catalog order, so `Ord` (and every `BTreeMap` keyed by it)
/// yields categories in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKey {
    Structure,
    TechnicalDepth,
    Impact,
    Clarity,
    Ats,
}

impl CategoryKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKey::Structure => "structure",
            CategoryKey::TechnicalDepth => "technical_depth",
            CategoryKey::Impact => "impact",
            CategoryKey::Clarity => "clarity",
            CategoryKey::Ats => "ats",
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for CategoryKey {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATALOG
            .iter()
            .map(|c| c.key)
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// One entry of the fixed scoring catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Category {
    pub key: CategoryKey,
    pub label: &'static str,
    pub max_score: f64,
    /// Presentation color token for chips and section headers.
    pub color: &'static str,
}

/// The five scoring dimensions, in display order. Maxima sum to 100.
pub static CATALOG: [Category; 5] = [
    Category {
        key: CategoryKey::Structure,
        label: "Structure",
        max_score: 20.0,
        color: "indigo",
    },
    Category {
        key: CategoryKey::TechnicalDepth,
        label: "Technical Depth",
        max_score: 25.0,
        color: "purple",
    },
    Category {
        key: CategoryKey::Impact,
        label: "Impact",
        max_score: 25.0,
        color: "emerald",
    },
    Category {
        key: CategoryKey::Clarity,
        label: "Clarity",
        max_score: 15.0,
        color: "amber",
    },
    Category {
        key: CategoryKey::Ats,
        label: "ATS Optimization",
        max_score: 15.0,
        color: "sky",
    },
];
