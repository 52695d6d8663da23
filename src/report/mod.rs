pub mod csv;
pub mod json;
pub mod md;

use crate::compare::RankedSite;
use crate::error::{Result, SiteScoreError};
use crate::types::catalog::Catalog;
use crate::types::scoring::{total_scale, Score, TotalScore};
use crate::types::site::{Coordinates, EnvironmentalClass, Site};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

/// Read-only view of a site joined with its catalog, as exported.
#[derive(Debug, Clone, Serialize)]
pub struct SiteReport {
    pub name: String,
    pub date: NaiveDate,
    pub address: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub area: Option<f64>,
    pub environmental_class: Option<EnvironmentalClass>,
    pub notes: String,
    pub disqualified: bool,
    pub total: TotalScore,
    pub total_min: f64,
    pub total_max: f64,
    pub categories: Vec<CategoryReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub id: String,
    pub name: String,
    pub weight: f64,
    pub score: Score,
    pub gated: bool,
    pub criteria: Vec<CriterionReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CriterionReport {
    pub id: String,
    pub name: String,
    pub score: Score,
    pub answer: Option<String>,
}

impl SiteReport {
    pub fn build(site: &Site, catalog: &Catalog) -> Result<Self> {
        let (total_min, total_max) = total_scale(catalog);
        let mut categories = Vec::with_capacity(catalog.categories().len());
        for category in catalog.categories() {
            let result = site
                .scores
                .categories
                .iter()
                .find(|result| result.id == category.id)
                .ok_or_else(|| {
                    SiteScoreError::RegistryMismatch(format!(
                        "site '{}' has no scores for category '{}'",
                        site.name, category.id
                    ))
                })?;

            let criteria = category
                .criteria
                .iter()
                .map(|criterion| {
                    let score = result
                        .criteria
                        .iter()
                        .find(|scored| scored.id == criterion.id)
                        .map_or(Score::Pending, |scored| scored.score);
                    let answer = site
                        .answers
                        .get(&criterion.id)
                        .and_then(|key| criterion.option(key).ok())
                        .map(|option| option.label.clone());
                    CriterionReport {
                        id: criterion.id.clone(),
                        name: criterion.name.clone(),
                        score,
                        answer,
                    }
                })
                .collect();

            categories.push(CategoryReport {
                id: category.id.clone(),
                name: category.name.clone(),
                weight: catalog.weight(category),
                score: result.score,
                gated: result.gated,
                criteria,
            });
        }

        Ok(Self {
            name: site.name.clone(),
            date: site.date,
            address: site.address.clone(),
            coordinates: site.coordinates,
            area: site.area,
            environmental_class: site.environmental_class,
            notes: site.notes.clone(),
            disqualified: site.disqualified(),
            total: site.scores.total,
            total_min,
            total_max,
            categories,
        })
    }
}

pub fn render_site(site: &Site, catalog: &Catalog, format: OutputFormat) -> Result<String> {
    let report = SiteReport::build(site, catalog)?;
    match format {
        OutputFormat::Json => json::to_json(&report).map_err(SiteScoreError::Json),
        OutputFormat::Md => Ok(md::site_to_markdown(&report)),
    }
}

pub fn render_sites(sites: &[&Site], catalog: &Catalog, format: OutputFormat) -> Result<String> {
    let reports = sites
        .iter()
        .map(|site| SiteReport::build(site, catalog))
        .collect::<Result<Vec<_>>>()?;
    match format {
        OutputFormat::Json => json::to_json(&reports).map_err(SiteScoreError::Json),
        OutputFormat::Md => Ok(reports
            .iter()
            .map(md::site_to_markdown)
            .collect::<Vec<_>>()
            .join("\n---\n\n")),
    }
}

pub fn render_comparison(
    ranked: &[RankedSite],
    catalog: &Catalog,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => json::to_json(&ranked).map_err(SiteScoreError::Json),
        OutputFormat::Md => Ok(md::comparison_to_markdown(ranked, catalog)),
    }
}

pub fn render_catalog(catalog: &Catalog, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::to_json(catalog).map_err(SiteScoreError::Json),
        OutputFormat::Md => Ok(md::catalog_to_markdown(catalog)),
    }
}

/// Total score as shown to people, e.g. `13/20` or `64.0%`.
pub fn format_total(total: TotalScore, max: f64) -> String {
    match total {
        TotalScore::Pending => "pending".to_string(),
        TotalScore::Points(points) => format!("{points}/{max:.0}"),
        TotalScore::Percent(percent) => format!("{percent:.1}%"),
    }
}
