use crate::catalog::BUILTIN_NAMES;
use crate::error::SiteScoreError;
use crate::search::CombineMode;
use crate::types::catalog::{GatingScope, ScoringMode};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteScoreConfig {
    pub catalog: Option<CatalogConfig>,
    pub registry: Option<RegistryConfig>,
    pub search: Option<SearchConfig>,
    pub geocoder: Option<GeocoderConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    pub builtin: Option<String>,
    pub path: Option<String>,
    pub mode: Option<ScoringMode>,
    pub gating: Option<GatingScope>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_registry_path")]
    pub path: String,
}

fn default_registry_path() -> String {
    "sites.json".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchConfig {
    pub mode: Option<CombineMode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocoderConfig {
    #[serde(default)]
    pub addresses: BTreeMap<String, [f64; 2]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Which catalog a workspace evaluates against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Builtin(String),
    File(String),
}

impl SiteScoreConfig {
    pub fn catalog_source(&self) -> CatalogSource {
        let catalog = self.catalog.as_ref();
        match (
            catalog.and_then(|catalog| catalog.path.as_ref()),
            catalog.and_then(|catalog| catalog.builtin.as_ref()),
        ) {
            (Some(path), _) => CatalogSource::File(path.clone()),
            (None, Some(name)) => CatalogSource::Builtin(name.clone()),
            (None, None) => CatalogSource::Builtin("standard".to_string()),
        }
    }

    pub fn scoring_mode(&self) -> Option<ScoringMode> {
        self.catalog.as_ref().and_then(|catalog| catalog.mode)
    }

    pub fn gating_scope(&self) -> Option<GatingScope> {
        self.catalog.as_ref().and_then(|catalog| catalog.gating)
    }

    pub fn registry_path(&self) -> String {
        self.registry
            .as_ref()
            .map(|registry| registry.path.clone())
            .unwrap_or_else(default_registry_path)
    }

    pub fn search_mode(&self) -> CombineMode {
        self.search
            .as_ref()
            .and_then(|search| search.mode)
            .unwrap_or_default()
    }

    pub fn gazetteer(&self) -> BTreeMap<String, [f64; 2]> {
        self.geocoder
            .as_ref()
            .map(|geocoder| geocoder.addresses.clone())
            .unwrap_or_default()
    }

    pub fn log_level(&self) -> String {
        self.logging
            .as_ref()
            .map(|logging| logging.level.clone())
            .unwrap_or_else(default_log_level)
    }

    pub fn validate(&self) -> Result<(), SiteScoreError> {
        if let Some(catalog) = &self.catalog {
            if catalog.builtin.is_some() && catalog.path.is_some() {
                return Err(SiteScoreError::ConfigParse(
                    "catalog.builtin and catalog.path cannot both be set".to_string(),
                ));
            }
            if let Some(name) = &catalog.builtin {
                if !BUILTIN_NAMES.contains(&name.as_str()) {
                    return Err(SiteScoreError::ConfigParse(format!(
                        "unknown catalog.builtin: {name} (expected one of {})",
                        BUILTIN_NAMES.join(", ")
                    )));
                }
            }
            if catalog
                .path
                .as_ref()
                .is_some_and(|path| path.trim().is_empty())
            {
                return Err(SiteScoreError::ConfigParse(
                    "catalog.path must be non-empty".to_string(),
                ));
            }
        }

        if self.registry_path().trim().is_empty() {
            return Err(SiteScoreError::ConfigParse(
                "registry.path must be non-empty".to_string(),
            ));
        }

        for (address, [latitude, longitude]) in self.gazetteer() {
            if address.trim().is_empty() {
                return Err(SiteScoreError::ConfigParse(
                    "geocoder.addresses keys must be non-empty".to_string(),
                ));
            }
            if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
                return Err(SiteScoreError::ConfigParse(format!(
                    "geocoder.addresses entry '{address}' has out-of-range coordinates"
                )));
            }
        }

        Ok(())
    }
}
