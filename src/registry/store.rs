use super::SiteRegistry;
use crate::error::{Result, SiteScoreError};
use crate::types::catalog::Catalog;
use crate::types::site::Site;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct RegistrySnapshot {
    version: u32,
    catalog: String,
    saved_at: String,
    next_id: u64,
    sites: Vec<Site>,
}

/// Loads a registry snapshot, or an empty registry when the file is absent.
pub fn load(path: &Path, catalog: &Catalog) -> Result<SiteRegistry> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no registry file; starting empty");
        return Ok(SiteRegistry::new(catalog));
    }

    let content = fs::read_to_string(path)?;
    let snapshot: RegistrySnapshot = serde_json::from_str(&content)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SiteScoreError::RegistryMismatch(format!(
            "unsupported registry version {} in {}",
            snapshot.version,
            path.display()
        )));
    }
    if snapshot.catalog != catalog.name {
        return Err(SiteScoreError::RegistryMismatch(format!(
            "{} was scored with catalog '{}', but the workspace uses '{}'",
            path.display(),
            snapshot.catalog,
            catalog.name
        )));
    }

    let registry = SiteRegistry::from_parts(catalog, snapshot.sites, snapshot.next_id)?;
    tracing::debug!(path = %path.display(), sites = registry.len(), "loaded registry");
    Ok(registry)
}

pub fn save(path: &Path, registry: &SiteRegistry) -> Result<()> {
    let snapshot = RegistrySnapshot {
        version: SNAPSHOT_VERSION,
        catalog: registry.catalog_name().to_string(),
        saved_at: Utc::now().to_rfc3339(),
        next_id: registry.next_id(),
        sites: registry.list().to_vec(),
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&snapshot)?;
    fs::write(path, json)?;
    tracing::info!(path = %path.display(), sites = registry.len(), "saved registry");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::scoring::{self, AnswerSet};
    use crate::types::catalog::ScoringMode;
    use crate::types::scoring::TotalScore;
    use crate::types::site::{EnvironmentalClass, NewSite};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 2).expect("valid date")
    }

    #[test]
    fn load_returns_empty_registry_when_file_missing() {
        let dir = TempDir::new().expect("temp dir should be created");
        let catalog = catalog::builtin("standard").expect("standard loads");
        let registry = load(&dir.path().join("sites.json"), &catalog).expect("load succeeds");
        assert!(registry.is_empty());
    }

    #[test]
    fn save_then_load_preserves_sites_answers_and_ids() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("data/sites.json");
        let catalog = catalog::builtin("standard").expect("standard loads");
        let mut registry = SiteRegistry::new(&catalog);
        registry
            .add(
                NewSite::new("Harbour North", date())
                    .with_address("Kade 1, Rotterdam")
                    .with_coordinates(51.92, 4.48)
                    .with_area(1250.0)
                    .with_environmental_class(EnvironmentalClass::II),
            )
            .expect("site adds");
        registry.add(NewSite::new("Removed", date())).expect("site adds");
        registry.remove("Removed").expect("site removes");

        let answers: AnswerSet = [("air_quality", "at_limit")].into_iter().collect();
        let scored = scoring::score(&catalog, &answers).expect("answers score");
        registry
            .update_answers("Harbour North", answers.clone())
            .expect("answers stored");
        registry
            .update_scores("Harbour North", scored.clone())
            .expect("scores stored");

        save(&path, &registry).expect("save succeeds");
        let mut loaded = load(&path, &catalog).expect("load succeeds");

        let site = loaded.get("Harbour North").expect("site survives");
        assert_eq!(site.answers, answers);
        assert_eq!(site.scores, scored);
        assert_eq!(site.environmental_class, Some(EnvironmentalClass::II));

        let next = loaded.add(NewSite::new("Next", date())).expect("site adds");
        assert_eq!(next.0, 3);
    }

    #[test]
    fn load_rescores_under_the_current_scoring_mode() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("sites.json");
        let mut catalog = catalog::builtin("standard").expect("standard loads");
        let mut registry = SiteRegistry::new(&catalog);
        registry.add(NewSite::new("A", date())).expect("site adds");
        let answers: AnswerSet = [("zoning_plan", "non_conforming")].into_iter().collect();
        let scored = scoring::score(&catalog, &answers).expect("answers score");
        assert_eq!(scored.total, TotalScore::Points(4));
        registry
            .update_answers("A", answers.clone())
            .expect("answers stored");
        registry.update_scores("A", scored).expect("scores stored");
        save(&path, &registry).expect("save succeeds");

        catalog.mode = ScoringMode::WeightedPercentage;
        let loaded = load(&path, &catalog).expect("load succeeds");
        let site = loaded.get("A").expect("site survives");
        let fresh = scoring::score(&catalog, &answers).expect("answers score");
        assert_eq!(site.scores, fresh);
        assert_eq!(site.scores.total, TotalScore::Percent(20.0));
        assert!(site.disqualified());
    }

    #[test]
    fn load_rejects_snapshot_from_other_catalog() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("sites.json");
        let standard = catalog::builtin("standard").expect("standard loads");
        let weighted = catalog::builtin("weighted").expect("weighted loads");
        save(&path, &SiteRegistry::new(&standard)).expect("save succeeds");

        let err = load(&path, &weighted).expect_err("mismatch should fail");
        assert!(matches!(err, SiteScoreError::RegistryMismatch(_)));
    }
}
