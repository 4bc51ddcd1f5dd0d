//! Application context for unified dependency injection.

use std::path::{Path, PathBuf};

use crate::auth::token_from_env;
use crate::config::{GlobalConfigStore, LocalRcStore, default_global_config_path};
use crate::definition::DefinitionLoader;
use crate::environment::Environment;
use crate::error::Result;
use crate::remote::HttpRemoteClient;

/// Unified application context for dependency injection.
///
/// Frontends create this once and pass it to commands. Every store and
/// client a command needs is derived from the paths held here.
#[derive(Debug, Clone)]
pub struct AppContext {
    service_dir: PathBuf,
    global_config_path: PathBuf,
    shared_host: Option<String>,
    token: Option<String>,
}

impl AppContext {
    /// Create a new context with explicit paths.
    pub fn new(service_dir: PathBuf, global_config_path: PathBuf) -> Self {
        Self {
            service_dir,
            global_config_path,
            shared_host: None,
            token: None,
        }
    }

    /// Context for the current directory, the default config path and `STRATA_TOKEN`.
    pub fn with_defaults() -> anyhow::Result<Self> {
        let service_dir = std::env::current_dir()?;
        let global_config_path = default_global_config_path()?;
        let mut ctx = Self::new(service_dir, global_config_path);
        ctx.token = token_from_env();
        Ok(ctx)
    }

    /// Override the host serving shared clusters.
    pub fn with_shared_host(mut self, host: impl Into<String>) -> Self {
        self.shared_host = Some(host.into());
        self
    }

    /// Use a token that takes precedence over the one in the global config.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn service_dir(&self) -> &Path {
        &self.service_dir
    }

    pub fn global_config_path(&self) -> &Path {
        &self.global_config_path
    }

    pub fn global_store(&self) -> GlobalConfigStore {
        GlobalConfigStore::new(self.global_config_path.clone())
    }

    pub fn local_store(&self) -> LocalRcStore {
        LocalRcStore::for_service_dir(&self.service_dir)
    }

    /// Load the environment from both config files.
    pub fn environment(&self) -> Result<Environment> {
        let mut env = Environment::load(self.global_store(), self.local_store())?;
        if let Some(host) = &self.shared_host {
            env = env.with_shared_host(host.clone());
        }
        if let Some(token) = &self.token {
            env = env.with_token(token.clone());
        }
        Ok(env)
    }

    pub fn definition_loader(&self) -> DefinitionLoader {
        DefinitionLoader::new(self.service_dir.clone())
    }

    /// HTTP client configured for every cluster `env` knows.
    pub fn remote_client(&self, env: &Environment) -> Result<HttpRemoteClient> {
        HttpRemoteClient::from_environment(env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_environment_applies_overrides() {
        let temp = TempDir::new().unwrap();
        let ctx = AppContext::new(temp.path().to_path_buf(), temp.path().join("config.json"))
            .with_shared_host("http://127.0.0.1:9")
            .with_token("t0ken");

        let env = ctx.environment().unwrap();

        assert_eq!(
            env.cluster_host("shared-eu-west-1").as_deref(),
            Some("http://127.0.0.1:9")
        );
        assert_eq!(env.token_for_cluster("local").as_deref(), Some("t0ken"));
        assert_eq!(ctx.local_store().path(), temp.path().join(".stratarc"));
    }
}
