//! Filtered search over the registry. Read-only; results keep registry order.

pub mod geo;

use crate::error::{Result, SiteScoreError};
use crate::registry::SiteRegistry;
use crate::types::site::{Coordinates, EnvironmentalClass, Site};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How active filter groups combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineMode {
    /// A site must pass every active filter.
    #[default]
    And,
    /// A site must pass at least one active group: text, location,
    /// attributes (area and environmental class) or scores.
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusFilter {
    pub center: Coordinates,
    pub radius_km: f64,
}

#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    pub text: Option<String>,
    pub min_area: Option<f64>,
    pub environmental_class: Option<EnvironmentalClass>,
    pub radius: Option<RadiusFilter>,
    pub min_total_score: Option<f64>,
    pub min_category_scores: BTreeMap<String, u8>,
    pub mode: CombineMode,
}

impl FilterSpec {
    pub fn is_empty(&self) -> bool {
        self.text_query().is_none()
            && self.min_area.is_none()
            && self.environmental_class.is_none()
            && self.radius.is_none()
            && self.min_total_score.is_none()
            && self.min_category_scores.is_empty()
    }

    fn text_query(&self) -> Option<String> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase)
    }

    fn validate(&self, registry: &SiteRegistry) -> Result<()> {
        if let Some(radius) = &self.radius {
            if !radius.radius_km.is_finite() || radius.radius_km < 0.0 {
                return Err(SiteScoreError::Validation(format!(
                    "radius must be a non-negative number of kilometres (got {})",
                    radius.radius_km
                )));
            }
        }
        if let Some(min_area) = self.min_area {
            if !min_area.is_finite() || min_area < 0.0 {
                return Err(SiteScoreError::Validation(format!(
                    "minimum area must be non-negative (got {min_area})"
                )));
            }
        }
        for (category, minimum) in &self.min_category_scores {
            if !registry.category_ids().any(|id| id == category) {
                return Err(SiteScoreError::UnknownCategory(category.clone()));
            }
            if !(1..=5).contains(minimum) {
                return Err(SiteScoreError::Validation(format!(
                    "minimum score for '{category}' must be between 1 and 5"
                )));
            }
        }
        Ok(())
    }
}

pub fn search<'a>(registry: &'a SiteRegistry, filter: &FilterSpec) -> Result<Vec<&'a Site>> {
    filter.validate(registry)?;
    let text = filter.text_query();

    Ok(registry
        .list()
        .iter()
        .filter(|site| matches(site, filter, text.as_deref()))
        .collect())
}

fn matches(site: &Site, filter: &FilterSpec, text: Option<&str>) -> bool {
    let groups = [
        text.map(|query| text_matches(site, query)),
        filter.radius.map(|radius| within_radius(site, radius)),
        attributes_match(site, filter),
        scores_match(site, filter),
    ];
    let mut active = groups.iter().flatten().peekable();
    if active.peek().is_none() {
        return true;
    }
    match filter.mode {
        CombineMode::And => active.all(|passed| *passed),
        CombineMode::Or => active.any(|passed| *passed),
    }
}

fn text_matches(site: &Site, query: &str) -> bool {
    site.name.to_lowercase().contains(query)
        || site
            .address
            .as_ref()
            .is_some_and(|address| address.to_lowercase().contains(query))
}

/// Sites without coordinates never fall inside a radius.
fn within_radius(site: &Site, radius: RadiusFilter) -> bool {
    site.coordinates
        .is_some_and(|coordinates| geo::haversine_km(radius.center, coordinates) <= radius.radius_km)
}

fn attributes_match(site: &Site, filter: &FilterSpec) -> Option<bool> {
    if filter.min_area.is_none() && filter.environmental_class.is_none() {
        return None;
    }
    let area_ok = filter
        .min_area
        .map_or(true, |min| site.area.is_some_and(|area| area >= min));
    let class_ok = filter
        .environmental_class
        .map_or(true, |class| site.environmental_class == Some(class));
    Some(area_ok && class_ok)
}

/// Pending scores never satisfy a minimum.
fn scores_match(site: &Site, filter: &FilterSpec) -> Option<bool> {
    if filter.min_total_score.is_none() && filter.min_category_scores.is_empty() {
        return None;
    }
    let total_ok = filter.min_total_score.map_or(true, |min| {
        site.scores.total.value().is_some_and(|total| total >= min)
    });
    let categories_ok = filter.min_category_scores.iter().all(|(category, min)| {
        site.scores
            .category_score(category)
            .and_then(|score| score.value())
            .is_some_and(|score| score >= *min)
    });
    Some(total_ok && categories_ok)
}
