use crate::error::{Result, SiteScoreError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const WEIGHT_TOLERANCE: f64 = 0.001;

/// How category scores are folded into a site total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Plain sum of 1-5 category scores.
    #[default]
    Sum,
    /// `sum(score * weight) * 20`, clamped to 0-100.
    WeightedPercentage,
}

/// How far a disqualifying gating answer reaches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatingScope {
    /// Every category drops to the minimum and the site is disqualified.
    #[default]
    Site,
    /// Only the gating criterion's own category drops to the minimum.
    Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub name: String,
    #[serde(default)]
    pub mode: ScoringMode,
    #[serde(default)]
    pub gating: GatingScope,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub weight: Option<f64>,
    pub criteria: Vec<SubCriterion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCriterion {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub gating: bool,
    #[serde(default = "default_required")]
    pub required: bool,
    /// Where an assessor finds the information needed to answer.
    pub hint: Option<String>,
    pub options: Vec<AnswerOption>,
}

fn default_required() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub key: String,
    pub label: String,
    pub points: u8,
}

impl Catalog {
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Result<&Category> {
        self.categories
            .iter()
            .find(|category| category.id == id)
            .ok_or_else(|| SiteScoreError::UnknownCategory(id.to_string()))
    }

    pub fn sub_criteria(&self, category_id: &str) -> Result<&[SubCriterion]> {
        self.category(category_id)
            .map(|category| category.criteria.as_slice())
    }

    /// Looks a criterion up by id across all categories.
    pub fn criterion(&self, id: &str) -> Result<(&Category, &SubCriterion)> {
        self.categories
            .iter()
            .find_map(|category| {
                category
                    .criteria
                    .iter()
                    .find(|criterion| criterion.id == id)
                    .map(|criterion| (category, criterion))
            })
            .ok_or_else(|| SiteScoreError::UnknownCriterion(id.to_string()))
    }

    pub fn point_value(&self, criterion_id: &str, option_key: &str) -> Result<u8> {
        let (_, criterion) = self.criterion(criterion_id)?;
        criterion.option(option_key).map(|option| option.points)
    }

    /// Effective weight of a category; catalogs without declared weights
    /// weigh every category equally.
    pub fn weight(&self, category: &Category) -> f64 {
        match category.weight {
            Some(weight) => weight,
            None => 1.0 / self.categories.len().max(1) as f64,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SiteScoreError::CatalogInvalid(
                "catalog name must be non-empty".to_string(),
            ));
        }
        if self.categories.is_empty() {
            return Err(SiteScoreError::CatalogInvalid(format!(
                "catalog '{}' must define at least one category",
                self.name
            )));
        }

        let mut category_ids = HashSet::new();
        let mut criterion_ids = HashSet::new();
        for category in &self.categories {
            if category.id.trim().is_empty() {
                return Err(SiteScoreError::CatalogInvalid(
                    "category ids must be non-empty".to_string(),
                ));
            }
            if !category_ids.insert(category.id.as_str()) {
                return Err(SiteScoreError::CatalogInvalid(format!(
                    "duplicate category id: {}",
                    category.id
                )));
            }
            if category.criteria.is_empty() {
                return Err(SiteScoreError::CatalogInvalid(format!(
                    "category '{}' must define at least one criterion",
                    category.id
                )));
            }

            let gating_count = category
                .criteria
                .iter()
                .filter(|criterion| criterion.gating)
                .count();
            if gating_count > 1 {
                return Err(SiteScoreError::CatalogInvalid(format!(
                    "category '{}' has {gating_count} gating criteria; at most one is allowed",
                    category.id
                )));
            }

            for criterion in &category.criteria {
                if !criterion_ids.insert(criterion.id.as_str()) {
                    return Err(SiteScoreError::CatalogInvalid(format!(
                        "duplicate criterion id: {}",
                        criterion.id
                    )));
                }
                criterion.validate()?;
            }
        }

        self.validate_weights()
    }

    fn validate_weights(&self) -> Result<()> {
        let declared = self
            .categories
            .iter()
            .filter(|category| category.weight.is_some())
            .count();
        if declared == 0 {
            return Ok(());
        }
        if declared != self.categories.len() {
            return Err(SiteScoreError::CatalogInvalid(format!(
                "catalog '{}' declares weights for {declared} of {} categories; declare all or none",
                self.name,
                self.categories.len()
            )));
        }

        let mut sum = 0.0;
        for category in &self.categories {
            let weight = category.weight.unwrap_or_default();
            if !(0.0..=1.0).contains(&weight) {
                return Err(SiteScoreError::CatalogInvalid(format!(
                    "categories.{}.weight must be between 0.0 and 1.0",
                    category.id
                )));
            }
            sum += weight;
        }
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(SiteScoreError::CatalogInvalid(format!(
                "category weights must sum to 1.0 (found {sum:.3})"
            )));
        }
        Ok(())
    }
}

impl SubCriterion {
    pub fn option(&self, key: &str) -> Result<&AnswerOption> {
        self.options
            .iter()
            .find(|option| option.key == key)
            .ok_or_else(|| SiteScoreError::UnknownOption {
                criterion: self.id.clone(),
                option: key.to_string(),
            })
    }

    /// Resolves user input to an option: exact key, case-insensitive label,
    /// or 1-based position in the option list.
    pub fn resolve_option(&self, input: &str) -> Result<&AnswerOption> {
        let trimmed = input.trim();
        if let Ok(option) = self.option(trimmed) {
            return Ok(option);
        }
        if let Some(option) = self
            .options
            .iter()
            .find(|option| option.label.eq_ignore_ascii_case(trimmed))
        {
            return Ok(option);
        }
        trimmed
            .parse::<usize>()
            .ok()
            .and_then(|position| position.checked_sub(1))
            .and_then(|index| self.options.get(index))
            .ok_or_else(|| SiteScoreError::UnknownOption {
                criterion: self.id.clone(),
                option: trimmed.to_string(),
            })
    }

    /// The answer that disqualifies a site: the lowest-valued option of a
    /// gating criterion.
    pub fn disqualifying_option(&self) -> Option<&AnswerOption> {
        if !self.gating {
            return None;
        }
        self.options.iter().min_by_key(|option| option.points)
    }

    fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(SiteScoreError::CatalogInvalid(
                "criterion ids must be non-empty".to_string(),
            ));
        }
        if self.options.len() < 2 {
            return Err(SiteScoreError::CatalogInvalid(format!(
                "criterion '{}' must offer at least two options",
                self.id
            )));
        }
        let mut keys = HashSet::new();
        for option in &self.options {
            if !keys.insert(option.key.as_str()) {
                return Err(SiteScoreError::CatalogInvalid(format!(
                    "criterion '{}' contains duplicate option: {}",
                    self.id, option.key
                )));
            }
            if !(1..=5).contains(&option.points) {
                return Err(SiteScoreError::CatalogInvalid(format!(
                    "criterion '{}' option '{}' has {} points; expected 1-5",
                    self.id, option.key, option.points
                )));
            }
        }
        if self.gating {
            let lowest = self.options.iter().map(|option| option.points).min();
            let lowest_count = self
                .options
                .iter()
                .filter(|option| Some(option.points) == lowest)
                .count();
            if lowest_count > 1 {
                return Err(SiteScoreError::CatalogInvalid(format!(
                    "gating criterion '{}' must have a single lowest-valued option",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> Catalog {
        toml::from_str(toml_str).expect("catalog should parse")
    }

    const MINIMAL: &str = r#"
name = "minimal"

[[categories]]
id = "zoning"
name = "Zoning"

[[categories.criteria]]
id = "plan"
name = "Zoning plan"
gating = true

[[categories.criteria.options]]
key = "conforming"
label = "Conforms"
points = 5

[[categories.criteria.options]]
key = "non_conforming"
label = "Does not conform"
points = 1
"#;

    #[test]
    fn parse_minimal_catalog_with_defaults() {
        let catalog = parse(MINIMAL);
        assert_eq!(catalog.mode, ScoringMode::Sum);
        assert_eq!(catalog.gating, GatingScope::Site);
        let (_, criterion) = catalog.criterion("plan").expect("criterion exists");
        assert!(criterion.required);
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn point_value_rejects_unregistered_option() {
        let catalog = parse(MINIMAL);
        assert_eq!(catalog.point_value("plan", "conforming").ok(), Some(5));
        let err = catalog
            .point_value("plan", "maybe")
            .expect_err("unknown option should fail");
        assert!(matches!(err, SiteScoreError::UnknownOption { .. }));
    }

    #[test]
    fn disqualifying_option_is_lowest_value_of_gating_criterion() {
        let catalog = parse(MINIMAL);
        let (_, criterion) = catalog.criterion("plan").expect("criterion exists");
        assert_eq!(
            criterion.disqualifying_option().map(|option| option.key.as_str()),
            Some("non_conforming")
        );
    }

    #[test]
    fn resolve_option_accepts_label_and_position() {
        let catalog = parse(MINIMAL);
        let (_, criterion) = catalog.criterion("plan").expect("criterion exists");
        assert_eq!(
            criterion
                .resolve_option("does not conform")
                .map(|option| option.points)
                .ok(),
            Some(1)
        );
        assert_eq!(
            criterion.resolve_option("1").map(|option| option.points).ok(),
            Some(5)
        );
        assert!(criterion.resolve_option("3").is_err());
    }

    #[test]
    fn equal_weights_when_none_declared() {
        let catalog = parse(MINIMAL);
        let category = &catalog.categories[0];
        assert!((catalog.weight(category) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn validate_rejects_partial_weights() {
        let mut catalog = parse(MINIMAL);
        let mut second = catalog.categories[0].clone();
        second.id = "other".to_string();
        second.criteria[0].id = "other_plan".to_string();
        catalog.categories[0].weight = Some(0.5);
        catalog.categories.push(second);
        let err = catalog.validate().expect_err("partial weights should fail");
        assert!(err.to_string().contains("declare all or none"));
    }

    #[test]
    fn validate_rejects_weights_not_summing_to_one() {
        let mut catalog = parse(MINIMAL);
        catalog.categories[0].weight = Some(0.8);
        let err = catalog.validate().expect_err("weight sum should fail");
        assert!(err.to_string().contains("must sum to 1.0"));
    }

    #[test]
    fn validate_rejects_points_out_of_range() {
        let mut catalog = parse(MINIMAL);
        catalog.categories[0].criteria[0].options[0].points = 7;
        let err = catalog.validate().expect_err("points out of range should fail");
        assert!(err.to_string().contains("expected 1-5"));
    }

    #[test]
    fn validate_rejects_two_gating_criteria_in_one_category() {
        let mut catalog = parse(MINIMAL);
        let mut second = catalog.categories[0].criteria[0].clone();
        second.id = "plan_b".to_string();
        catalog.categories[0].criteria.push(second);
        let err = catalog.validate().expect_err("double gating should fail");
        assert!(err.to_string().contains("at most one"));
    }

    #[test]
    fn validate_rejects_duplicate_criterion_ids_across_categories() {
        let mut catalog = parse(MINIMAL);
        let mut second = catalog.categories[0].clone();
        second.id = "other".to_string();
        catalog.categories.push(second);
        let err = catalog.validate().expect_err("duplicate ids should fail");
        assert!(err.to_string().contains("duplicate criterion id"));
    }
}
