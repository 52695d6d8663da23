//! Criterion catalogs: the built-in questionnaires and loading of custom
//! catalogs from TOML files.

use crate::error::{Result, SiteScoreError};
use crate::types::catalog::Catalog;
use crate::types::config::{CatalogSource, SiteScoreConfig};
use std::path::Path;

pub const BUILTIN_NAMES: [&str; 2] = ["standard", "weighted"];

const STANDARD: &str = include_str!("../../catalogs/standard.toml");
const WEIGHTED: &str = include_str!("../../catalogs/weighted.toml");

pub fn builtin(name: &str) -> Result<Catalog> {
    let source = match name {
        "standard" => STANDARD,
        "weighted" => WEIGHTED,
        other => {
            return Err(SiteScoreError::CatalogInvalid(format!(
                "no built-in catalog named '{other}'"
            )))
        }
    };
    parse(source)
}

pub fn load_from_path(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
        .map_err(|e| SiteScoreError::CatalogInvalid(format!("{}: {}", path.display(), e)))
}

pub fn parse(source: &str) -> Result<Catalog> {
    let catalog: Catalog = toml::from_str(source)?;
    catalog.validate()?;
    Ok(catalog)
}

/// Loads the catalog a workspace is configured for, applying the scoring
/// mode and gating overrides from configuration.
pub fn resolve(config: &SiteScoreConfig, root: &Path) -> Result<Catalog> {
    let mut catalog = match config.catalog_source() {
        CatalogSource::Builtin(name) => builtin(&name)?,
        CatalogSource::File(path) => load_from_path(&root.join(path))?,
    };
    if let Some(mode) = config.scoring_mode() {
        catalog.mode = mode;
    }
    if let Some(gating) = config.gating_scope() {
        catalog.gating = gating;
    }
    catalog.validate()?;
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::catalog::{GatingScope, ScoringMode};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn builtin_catalogs_parse_and_validate() {
        for name in BUILTIN_NAMES {
            let catalog = builtin(name).expect("builtin catalog should load");
            assert_eq!(catalog.name, name);
            assert_eq!(catalog.categories().len(), 4);
        }
    }

    #[test]
    fn standard_catalog_uses_three_option_gating_zoning() {
        let catalog = builtin("standard").expect("standard loads");
        assert_eq!(catalog.mode, ScoringMode::Sum);
        let (category, criterion) = catalog.criterion("zoning_plan").expect("zoning exists");
        assert_eq!(category.id, "spatial");
        assert!(criterion.gating);
        assert_eq!(criterion.options.len(), 3);
        assert_eq!(
            criterion.disqualifying_option().map(|option| option.key.as_str()),
            Some("non_conforming")
        );
    }

    #[test]
    fn weighted_catalog_uses_binary_gating_and_declared_weights() {
        let catalog = builtin("weighted").expect("weighted loads");
        assert_eq!(catalog.mode, ScoringMode::WeightedPercentage);
        let (_, criterion) = catalog.criterion("zoning_plan").expect("zoning exists");
        assert_eq!(criterion.options.len(), 2);
        let total: f64 = catalog
            .categories()
            .iter()
            .map(|category| category.weight.unwrap_or_default())
            .sum();
        assert!((total - 1.0).abs() < 0.001);
    }

    #[test]
    fn unknown_builtin_is_rejected() {
        assert!(matches!(
            builtin("deluxe"),
            Err(SiteScoreError::CatalogInvalid(_))
        ));
    }

    #[test]
    fn resolve_applies_config_overrides() {
        let cfg: SiteScoreConfig = toml::from_str(
            r#"
[catalog]
builtin = "standard"
mode = "weighted_percentage"
gating = "category"
"#,
        )
        .expect("config should parse");
        let dir = TempDir::new().expect("temp dir should be created");
        let catalog = resolve(&cfg, dir.path()).expect("catalog resolves");
        assert_eq!(catalog.mode, ScoringMode::WeightedPercentage);
        assert_eq!(catalog.gating, GatingScope::Category);
    }

    #[test]
    fn resolve_reads_catalog_file_relative_to_root() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::write(
            dir.path().join("custom.toml"),
            r#"
name = "custom"

[[categories]]
id = "only"
name = "Only"

[[categories.criteria]]
id = "q"
name = "Question"
options = [
    { key = "good", label = "Good", points = 5 },
    { key = "bad", label = "Bad", points = 1 },
]
"#,
        )
        .expect("catalog should write");
        let cfg: SiteScoreConfig = toml::from_str(
            r#"
[catalog]
path = "custom.toml"
"#,
        )
        .expect("config should parse");

        let catalog = resolve(&cfg, dir.path()).expect("catalog resolves");
        assert_eq!(catalog.name, "custom");
        assert_eq!(catalog.point_value("q", "bad").ok(), Some(1));
    }
}
