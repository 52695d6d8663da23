use crate::error::{Result, SiteScoreError};
use crate::types::config::SiteScoreConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "sitescore.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".sitescore/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/sitescore/config.toml";

/// Result of loading configuration for a workspace.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: SiteScoreConfig,
    /// False when the workspace has no `sitescore.toml` of its own.
    pub from_workspace: bool,
}

pub fn load_config(root: &Path) -> Result<LoadedConfig> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<LoadedConfig> {
    let repo_path = root.join(DEFAULT_CONFIG_FILE);
    let from_workspace = repo_path.exists();

    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &repo_path)?;
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE))?;

    let config: SiteScoreConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| SiteScoreError::ConfigParse(e.to_string()))?;
    config.validate()?;

    if from_workspace {
        tracing::debug!(path = %repo_path.display(), "loaded workspace config");
    } else {
        tracing::debug!(root = %root.display(), "no workspace config; using defaults");
    }

    Ok(LoadedConfig {
        config,
        from_workspace,
    })
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| SiteScoreError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}
