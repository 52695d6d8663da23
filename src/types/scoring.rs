use crate::types::catalog::{Catalog, ScoringMode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A criterion or category score. `Pending` means "not evaluated yet" and is
/// never interchangeable with a neutral 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum Score {
    Pending,
    Scored(u8),
}

impl Score {
    pub fn value(self) -> Option<u8> {
        match self {
            Score::Pending => None,
            Score::Scored(value) => Some(value),
        }
    }

    pub fn is_pending(self) -> bool {
        matches!(self, Score::Pending)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Pending => write!(f, "pending"),
            Score::Scored(value) => write!(f, "{value}/5"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum TotalScore {
    Pending,
    /// Sum of category scores.
    Points(u32),
    /// Weighted percentage on a 0-100 scale.
    Percent(f64),
}

impl TotalScore {
    pub fn value(self) -> Option<f64> {
        match self {
            TotalScore::Pending => None,
            TotalScore::Points(points) => Some(f64::from(points)),
            TotalScore::Percent(percent) => Some(percent),
        }
    }

    pub fn is_pending(self) -> bool {
        matches!(self, TotalScore::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionResult {
    pub id: String,
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub id: String,
    pub score: Score,
    /// Set when this category holds the gating criterion that was failed.
    #[serde(default)]
    pub gated: bool,
    pub criteria: Vec<CriterionResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub categories: Vec<CategoryResult>,
    pub total: TotalScore,
    pub disqualified: bool,
}

impl ScoredResult {
    /// The placeholder stored for a site that has not been evaluated.
    pub fn unscored(catalog: &Catalog) -> Self {
        let categories = catalog
            .categories()
            .iter()
            .map(|category| CategoryResult {
                id: category.id.clone(),
                score: Score::Pending,
                gated: false,
                criteria: category
                    .criteria
                    .iter()
                    .map(|criterion| CriterionResult {
                        id: criterion.id.clone(),
                        score: Score::Pending,
                    })
                    .collect(),
            })
            .collect();

        Self {
            categories,
            total: TotalScore::Pending,
            disqualified: false,
        }
    }

    pub fn category_score(&self, category_id: &str) -> Option<Score> {
        self.categories
            .iter()
            .find(|category| category.id == category_id)
            .map(|category| category.score)
    }

    pub fn same_shape(&self, other: &ScoredResult) -> bool {
        self.categories.len() == other.categories.len()
            && self
                .categories
                .iter()
                .zip(&other.categories)
                .all(|(left, right)| left.id == right.id)
    }
}

/// Bounds of the total score for a catalog, used by reports.
pub fn total_scale(catalog: &Catalog) -> (f64, f64) {
    match catalog.mode {
        ScoringMode::Sum => {
            let count = catalog.categories().len() as f64;
            (count, count * 5.0)
        }
        ScoringMode::WeightedPercentage => (0.0, 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_serializes_distinctly_from_scores() {
        let pending = serde_json::to_string(&Score::Pending).expect("serialize pending");
        let three = serde_json::to_string(&Score::Scored(3)).expect("serialize score");
        assert_eq!(pending, r#"{"state":"pending"}"#);
        assert_eq!(three, r#"{"state":"scored","value":3}"#);
    }

    #[test]
    fn total_value_is_none_only_when_pending() {
        assert_eq!(TotalScore::Pending.value(), None);
        assert_eq!(TotalScore::Points(12).value(), Some(12.0));
        assert_eq!(TotalScore::Percent(64.0).value(), Some(64.0));
    }
}
