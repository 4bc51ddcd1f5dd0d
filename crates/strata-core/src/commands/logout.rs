//! Logout command: forget the stored session.

use std::path::PathBuf;

use tracing::info;

use crate::context::AppContext;

#[derive(Debug, Clone)]
pub struct LogoutReport {
    /// Config file that was targeted
    pub path: PathBuf,
    /// Whether a file was actually removed
    pub removed: bool,
}

pub struct LogoutCommand {
    ctx: AppContext,
}

impl LogoutCommand {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    pub fn with_defaults() -> anyhow::Result<Self> {
        Ok(Self::new(AppContext::with_defaults()?))
    }

    /// Delete the global config file. Works even when the file is malformed.
    pub fn execute(&self) -> anyhow::Result<LogoutReport> {
        let store = self.ctx.global_store();
        let removed = store.delete()?;
        info!(path = %store.path().display(), removed, "logged out");
        Ok(LogoutReport {
            path: store.path().to_path_buf(),
            removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_logout_removes_malformed_config() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("config.json");
        std::fs::write(&config, "{ not json").unwrap();
        let cmd = LogoutCommand::new(AppContext::new(temp.path().to_path_buf(), config.clone()));

        let report = cmd.execute().unwrap();
        assert!(report.removed);
        assert!(!config.exists());

        let report = cmd.execute().unwrap();
        assert!(!report.removed);
    }
}
