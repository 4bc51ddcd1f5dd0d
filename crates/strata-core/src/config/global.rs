//! Per-user JSON config (`~/.strata/config.json`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StrataError};

/// Root structure of the per-user config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    /// Platform auth token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Private and local clusters, keyed by cluster name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub clusters: BTreeMap<String, ClusterConfig>,
}

/// A private or local cluster the user registered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    /// Base URL of the cluster, e.g. `http://localhost:60000`
    pub host: String,

    /// Cluster-specific token, used instead of the platform token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Loads, saves and deletes the per-user config file.
#[derive(Debug, Clone)]
pub struct GlobalConfigStore {
    path: PathBuf,
}

impl GlobalConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the default location (`STRATA_CONFIG` or `~/.strata/config.json`).
    pub fn from_default_path() -> anyhow::Result<Self> {
        Ok(Self::new(super::paths::default_global_config_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config. A missing file yields the default config.
    pub fn load(&self) -> Result<GlobalConfig> {
        if !self.path.exists() {
            return Ok(GlobalConfig::default());
        }
        let bytes = std::fs::read(&self.path).map_err(|e| StrataError::io(&self.path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| StrataError::ConfigParse {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Write the config as pretty-printed JSON, creating parent directories.
    pub fn save(&self, config: &GlobalConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StrataError::io(parent, e))?;
        }
        let mut content = serde_json::to_string_pretty(config).map_err(|e| {
            StrataError::ConfigParse {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })?;
        content.push('\n');
        std::fs::write(&self.path, content).map_err(|e| StrataError::io(&self.path, e))?;
        debug!(path = %self.path.display(), "saved global config");
        Ok(())
    }

    /// Remove the config file if present. Returns whether a file was removed.
    pub fn delete(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "deleted global config");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StrataError::io(&self.path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_returns_default() {
        let temp = TempDir::new().unwrap();
        let store = GlobalConfigStore::new(temp.path().join("config.json"));
        assert_eq!(store.load().unwrap(), GlobalConfig::default());
    }

    #[test]
    fn test_save_pretty_prints() {
        let temp = TempDir::new().unwrap();
        let store = GlobalConfigStore::new(temp.path().join(".strata").join("config.json"));
        let config = GlobalConfig {
            token: Some("tok".to_string()),
            clusters: BTreeMap::new(),
        };

        store.save(&config).unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "{\n  \"token\": \"tok\"\n}\n");
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let temp = TempDir::new().unwrap();
        let store = GlobalConfigStore::new(temp.path().join("config.json"));
        assert!(!store.delete().unwrap());
    }
}
