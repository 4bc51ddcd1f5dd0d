//! Decides whether a deploy targets an existing project or needs a new one.

use tracing::debug;

use crate::environment::Environment;
use crate::error::{Result, StrataError};
use crate::types::NamedTarget;

/// What the caller asked to deploy to
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    /// Target name or `<cluster>/<projectId>` literal
    pub target: Option<String>,
    /// Name of a new service to create
    pub new_service: Option<String>,
    /// Cluster for the new service
    pub new_service_cluster: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The target maps to an existing remote project
    Existing(NamedTarget),
    /// No project exists yet; one must be created in `cluster`
    New {
        target_name: String,
        cluster: String,
        /// Explicit service name; a placeholder is generated when `None`
        service_name: Option<String>,
    },
}

impl Resolution {
    /// Cluster the deploy runs against.
    pub fn cluster(&self) -> &str {
        match self {
            Resolution::Existing(named) => &named.target.cluster,
            Resolution::New { cluster, .. } => cluster,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Resolution::New { .. })
    }
}

/// Resolve a deploy request against the known targets.
///
/// Never mutates the environment: the cluster to activate is part of the
/// returned [`Resolution`].
pub fn resolve(env: &Environment, request: &ResolveRequest) -> Result<Resolution> {
    if let Some(service_name) = &request.new_service {
        let cluster = match &request.new_service_cluster {
            Some(cluster) => {
                if env.cluster_host(cluster).is_none() {
                    return Err(StrataError::UnknownCluster {
                        name: cluster.clone(),
                    });
                }
                cluster.clone()
            }
            None => env.active_cluster().to_string(),
        };
        let target_name = request
            .target
            .clone()
            .unwrap_or_else(|| env.get_default_target_name(&cluster));

        debug!(
            service = %service_name,
            cluster = %cluster,
            target_name = %target_name,
            "resolved new service"
        );
        return Ok(Resolution::New {
            target_name,
            cluster,
            service_name: Some(service_name.clone()),
        });
    }

    if let Some(named) = env.get_target_with_name(request.target.as_deref()) {
        debug!(
            target_name = %named.name,
            project = %named.target.project_id,
            "resolved existing target"
        );
        return Ok(Resolution::Existing(named));
    }

    let cluster = env.active_cluster().to_string();
    let target_name = request
        .target
        .clone()
        .unwrap_or_else(|| env.get_default_target_name(&cluster));

    debug!(
        cluster = %cluster,
        target_name = %target_name,
        "no existing target, falling through to creation"
    );
    Ok(Resolution::New {
        target_name,
        cluster,
        service_name: None,
    })
}
