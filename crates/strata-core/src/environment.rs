//! Environment: clusters, targets and the active cluster.
//!
//! Combines the per-user config (clusters, tokens) with the per-service
//! `.stratarc` (named targets). Holds no hidden global state: the active
//! cluster is a field of this value and every change to it is returned to
//! the caller.

use tracing::debug;

use crate::config::{GlobalConfig, GlobalConfigStore, LocalRc, LocalRcStore};
use crate::error::{Result, StrataError};
use crate::types::{NamedTarget, Target};

/// Cluster used when nothing else selects one
pub const DEFAULT_CLUSTER: &str = "shared-eu-west-1";

/// Built-in shared clusters
pub const SHARED_CLUSTERS: [&str; 3] = [
    "shared-eu-west-1",
    "shared-us-west-2",
    "shared-ap-northeast-1",
];

/// Base URL serving all shared clusters
pub const DEFAULT_SHARED_HOST: &str = "https://api.strata.cloud";

/// Name of the local development cluster
pub const LOCAL_CLUSTER: &str = "local";

/// Host of the local cluster when the user did not configure one
pub const DEFAULT_LOCAL_HOST: &str = "http://localhost:60000";

const SHARED_PREFIX: &str = "shared-";
const SHARED_DEFAULT_TARGET: &str = "dev";

#[derive(Debug, Clone)]
pub struct Environment {
    global_store: GlobalConfigStore,
    global: GlobalConfig,
    local_store: LocalRcStore,
    local: LocalRc,
    active_cluster: String,
    shared_host: String,
}

impl Environment {
    /// Load both config files.
    pub fn load(global_store: GlobalConfigStore, local_store: LocalRcStore) -> Result<Self> {
        let global = global_store.load()?;
        let local = local_store.load()?;

        let active_cluster = local
            .default
            .as_ref()
            .and_then(|name| local.targets.get(name))
            .map(|target| target.cluster.clone())
            .unwrap_or_else(|| DEFAULT_CLUSTER.to_string());

        debug!(
            active_cluster = %active_cluster,
            targets = local.targets.len(),
            "loaded environment"
        );

        Ok(Self {
            global_store,
            global,
            local_store,
            local,
            active_cluster,
            shared_host: DEFAULT_SHARED_HOST.to_string(),
        })
    }

    /// Override the host serving shared clusters.
    pub fn with_shared_host(mut self, host: impl Into<String>) -> Self {
        self.shared_host = host.into();
        self
    }

    /// Use `token` as the platform token for this process without persisting it.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.global.token = Some(token.into());
        self
    }

    pub fn global_config(&self) -> &GlobalConfig {
        &self.global
    }

    pub fn global_store(&self) -> &GlobalConfigStore {
        &self.global_store
    }

    pub fn local_rc(&self) -> &LocalRc {
        &self.local
    }

    /// Look up a target by name, or the default target when `name` is `None`.
    ///
    /// A name that is not registered but reads as `<cluster>/<projectId>` is
    /// taken as a literal target. Anything else is "not found".
    pub fn get_target_with_name(&self, name: Option<&str>) -> Option<NamedTarget> {
        let name = match name {
            Some(name) => name,
            None => self.local.default.as_deref()?,
        };

        if let Some(target) = self.local.targets.get(name) {
            return Some(NamedTarget {
                name: name.to_string(),
                target: target.clone(),
            });
        }

        name.parse::<Target>().ok().map(|target| NamedTarget {
            name: name.to_string(),
            target,
        })
    }

    /// Like [`get_target_with_name`](Self::get_target_with_name) for an explicit name,
    /// failing with `ServiceNotFound` when it does not resolve.
    pub fn require_target(&self, name: &str) -> Result<NamedTarget> {
        self.get_target_with_name(Some(name))
            .ok_or_else(|| StrataError::ServiceNotFound {
                name: name.to_string(),
            })
    }

    /// Select the active cluster and return it.
    pub fn set_active_cluster(&mut self, cluster: &str) -> Result<String> {
        if self.cluster_host(cluster).is_none() {
            return Err(StrataError::UnknownCluster {
                name: cluster.to_string(),
            });
        }
        debug!(cluster, "active cluster selected");
        self.active_cluster = cluster.to_string();
        Ok(self.active_cluster.clone())
    }

    pub fn active_cluster(&self) -> &str {
        &self.active_cluster
    }

    pub fn get_default_target_name(&self, cluster: &str) -> String {
        if self.is_shared_cluster(cluster) {
            SHARED_DEFAULT_TARGET.to_string()
        } else {
            cluster.to_string()
        }
    }

    pub fn is_shared_cluster(&self, cluster: &str) -> bool {
        cluster.starts_with(SHARED_PREFIX)
    }

    /// Region identifier of a shared cluster: `shared-eu-west-1` -> `EU_WEST_1`.
    pub fn get_region_from_cluster(&self, cluster: &str) -> Option<String> {
        cluster
            .strip_prefix(SHARED_PREFIX)
            .filter(|region| !region.is_empty())
            .map(|region| region.replace('-', "_").to_uppercase())
    }

    /// Base URL of a cluster, if known.
    pub fn cluster_host(&self, cluster: &str) -> Option<String> {
        if let Some(config) = self.global.clusters.get(cluster) {
            return Some(config.host.clone());
        }
        if self.is_shared_cluster(cluster) {
            return Some(self.shared_host.clone());
        }
        if cluster == LOCAL_CLUSTER {
            return Some(DEFAULT_LOCAL_HOST.to_string());
        }
        None
    }

    /// Token to present to a cluster: the cluster's own token, else the platform token.
    pub fn token_for_cluster(&self, cluster: &str) -> Option<String> {
        self.global
            .clusters
            .get(cluster)
            .and_then(|c| c.token.clone())
            .or_else(|| self.global.token.clone())
    }

    /// All known cluster names: built-in shared clusters, then user clusters.
    pub fn cluster_names(&self) -> Vec<String> {
        let mut names: Vec<String> = SHARED_CLUSTERS.iter().map(|s| s.to_string()).collect();
        for name in self.global.clusters.keys() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        if !names.iter().any(|n| n == LOCAL_CLUSTER) {
            names.push(LOCAL_CLUSTER.to_string());
        }
        names
    }

    pub fn set_local_target(&mut self, name: &str, target: Target) {
        debug!(name, target_name = %target, "registering local target");
        self.local.targets.insert(name.to_string(), target);
    }

    pub fn set_local_default_target(&mut self, name: &str) {
        self.local.default = Some(name.to_string());
    }

    pub fn has_local_default_target(&self) -> bool {
        self.local.default.is_some()
    }

    pub fn save_local_rc(&self) -> Result<()> {
        self.local_store.save(&self.local)
    }

    /// Public endpoint of a project.
    pub fn simple_endpoint(&self, target: &Target) -> String {
        let host = self
            .cluster_host(&target.cluster)
            .unwrap_or_else(|| self.shared_host.clone());
        format!(
            "{}/simple/v1/{}",
            host.trim_end_matches('/'),
            target.project_id
        )
    }
}
