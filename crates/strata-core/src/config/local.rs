//! Per-service local config (`.stratarc`).
//!
//! Holds the named targets of a service and which one is the default:
//!
//! ```toml
//! default = "dev"
//!
//! [targets]
//! dev = "shared-eu-west-1/cj8x2k1lm00001"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StrataError};
use crate::types::Target;

use super::parser;

/// Root structure of `.stratarc`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalRc {
    /// Name of the default target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Named targets
    #[serde(default)]
    pub targets: BTreeMap<String, Target>,
}

impl LocalRc {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(default) = &self.default
            && !self.targets.contains_key(default)
        {
            return Err(format!(
                "Default target '{}' is not defined in [targets]",
                default
            ));
        }
        Ok(())
    }
}

/// Loads and saves `.stratarc`.
#[derive(Debug, Clone)]
pub struct LocalRcStore {
    path: PathBuf,
}

impl LocalRcStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store for the `.stratarc` of a service directory.
    pub fn for_service_dir(service_dir: &Path) -> Self {
        Self::new(super::paths::local_rc_path(service_dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file. A missing file yields an empty config.
    pub fn load(&self) -> Result<LocalRc> {
        if !self.path.exists() {
            return Ok(LocalRc::default());
        }
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| StrataError::io(&self.path, e))?;
        parser::parse_local_rc_str(&content).map_err(|message| StrataError::ConfigParse {
            path: self.path.clone(),
            message,
        })
    }

    pub fn save(&self, rc: &LocalRc) -> Result<()> {
        let content = parser::to_toml(rc).map_err(|message| StrataError::ConfigParse {
            path: self.path.clone(),
            message,
        })?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| StrataError::io(parent, e))?;
        }
        std::fs::write(&self.path, content).map_err(|e| StrataError::io(&self.path, e))?;
        debug!(path = %self.path.display(), targets = rc.targets.len(), "saved local config");
        Ok(())
    }
}
