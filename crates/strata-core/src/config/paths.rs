//! Config path resolution helpers.

use std::path::{Path, PathBuf};

/// Environment variable overriding the global config file location
pub const CONFIG_PATH_ENV: &str = "STRATA_CONFIG";

/// Name of the per-service local config file
pub const LOCAL_RC_FILE_NAME: &str = ".stratarc";

pub fn global_config_path(home_dir: &Path) -> PathBuf {
    home_dir.join(".strata").join("config.json")
}

pub fn local_rc_path(service_dir: &Path) -> PathBuf {
    service_dir.join(LOCAL_RC_FILE_NAME)
}

/// Resolve the global config path, honouring `STRATA_CONFIG`.
pub fn default_global_config_path() -> anyhow::Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }
    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(global_config_path(&home))
}
