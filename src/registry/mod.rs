//! The site registry. Sites change only through the operations here; callers
//! get shared references and never mutate fields in place.

pub mod store;

use crate::error::{Result, SiteScoreError};
use crate::scoring::{self, AnswerSet};
use crate::types::catalog::Catalog;
use crate::types::scoring::{Score, ScoredResult};
use crate::types::site::{Coordinates, NewSite, Site, SiteId};

#[derive(Debug, Clone)]
pub struct SiteRegistry {
    catalog_name: String,
    template: ScoredResult,
    sites: Vec<Site>,
    next_id: u64,
}

impl SiteRegistry {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            catalog_name: catalog.name.clone(),
            template: ScoredResult::unscored(catalog),
            sites: Vec::new(),
            next_id: 1,
        }
    }

    pub fn catalog_name(&self) -> &str {
        &self.catalog_name
    }

    pub fn add(&mut self, new_site: NewSite) -> Result<SiteId> {
        let name = new_site.name;
        if name.trim().is_empty() {
            return Err(SiteScoreError::Validation(
                "site name must be non-empty".to_string(),
            ));
        }
        if name.trim() != name {
            return Err(SiteScoreError::Validation(format!(
                "site name '{name}' must not start or end with whitespace"
            )));
        }
        let date = new_site
            .date
            .ok_or_else(|| SiteScoreError::Validation("site date is required".to_string()))?;
        if self.position(&name).is_some() {
            return Err(SiteScoreError::DuplicateName(name));
        }
        let coordinates = Coordinates::from_pair(new_site.latitude, new_site.longitude)?;
        if let Some(area) = new_site.area {
            if !area.is_finite() || area <= 0.0 {
                return Err(SiteScoreError::Validation(format!(
                    "area must be a positive number of square metres (got {area})"
                )));
            }
        }
        let address = new_site
            .address
            .map(|address| address.trim().to_string())
            .filter(|address| !address.is_empty());

        let id = SiteId(self.next_id);
        self.next_id += 1;
        self.sites.push(Site {
            id,
            name,
            date,
            address,
            coordinates,
            area: new_site.area,
            environmental_class: new_site.environmental_class,
            notes: new_site.notes,
            answers: AnswerSet::new(),
            scores: self.template.clone(),
        });
        Ok(id)
    }

    pub fn remove(&mut self, name: &str) -> Result<Site> {
        let index = self.index_of(name)?;
        Ok(self.sites.remove(index))
    }

    pub fn update_scores(&mut self, name: &str, scored: ScoredResult) -> Result<()> {
        if !self.template.same_shape(&scored) {
            return Err(SiteScoreError::Validation(format!(
                "scores do not match the categories of catalog '{}'",
                self.catalog_name
            )));
        }
        let minimum = Score::Scored(1);
        if scored.disqualified
            && scored
                .categories
                .iter()
                .any(|category| category.score != minimum)
        {
            return Err(SiteScoreError::Validation(format!(
                "disqualified scores for '{name}' must put every category at the minimum"
            )));
        }
        let index = self.index_of(name)?;
        self.sites[index].scores = scored;
        Ok(())
    }

    pub fn update_answers(&mut self, name: &str, answers: AnswerSet) -> Result<()> {
        let index = self.index_of(name)?;
        self.sites[index].answers = answers;
        Ok(())
    }

    pub fn set_coordinates(
        &mut self,
        name: &str,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<()> {
        let coordinates = Coordinates::from_pair(latitude, longitude)?;
        let index = self.index_of(name)?;
        self.sites[index].coordinates = coordinates;
        Ok(())
    }

    pub fn set_notes(&mut self, name: &str, notes: impl Into<String>) -> Result<()> {
        let index = self.index_of(name)?;
        self.sites[index].notes = notes.into();
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Site> {
        self.index_of(name).map(|index| &self.sites[index])
    }

    /// Sites in insertion order.
    pub fn list(&self) -> &[Site] {
        &self.sites
    }

    /// Existing names containing `query`, ignoring case.
    pub fn similar_names(&self, query: &str) -> Vec<&str> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.sites
            .iter()
            .filter(|site| site.name.to_lowercase().contains(&needle))
            .map(|site| site.name.as_str())
            .collect()
    }

    pub fn category_ids(&self) -> impl Iterator<Item = &str> {
        self.template
            .categories
            .iter()
            .map(|category| category.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.sites.iter().position(|site| site.name == name)
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.position(name)
            .ok_or_else(|| SiteScoreError::NotFound(name.to_string()))
    }

    /// Rebuilds a registry from stored sites. Scores are derived again from
    /// the stored answers, so they always reflect the catalog in use.
    pub(crate) fn from_parts(
        catalog: &Catalog,
        mut sites: Vec<Site>,
        next_id: u64,
    ) -> Result<Self> {
        let mut registry = Self::new(catalog);
        for site in &mut sites {
            site.scores = scoring::score(catalog, &site.answers).map_err(|err| {
                SiteScoreError::RegistryMismatch(format!(
                    "stored answers for '{}' do not fit catalog '{}': {err}",
                    site.name, catalog.name
                ))
            })?;
        }
        let highest = sites.iter().map(|site| site.id.0).max().unwrap_or(0);
        registry.next_id = next_id.max(highest + 1);
        registry.sites = sites;
        Ok(registry)
    }

    pub(crate) fn next_id(&self) -> u64 {
        self.next_id
    }
}
