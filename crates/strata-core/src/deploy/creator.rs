//! Allocates a new remote project and registers it locally.

use tracing::info;

use crate::definition::ProjectDefinition;
use crate::environment::{Environment, LOCAL_CLUSTER};
use crate::error::Result;
use crate::names::placeholder_name;
use crate::remote::{CreateProjectRequest, RemoteClient};
use crate::reporter::Reporter;
use crate::types::{NamedTarget, Target};

#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Local name to register the new target under
    pub target_name: String,
    pub cluster: String,
    /// Service name; a placeholder is generated when `None`
    pub name: Option<String>,
    pub alias: Option<String>,
    /// Region override; derived from the cluster when `None`
    pub region: Option<String>,
}

pub struct ProjectCreator<'a> {
    remote: &'a dyn RemoteClient,
    reporter: &'a dyn Reporter,
}

impl<'a> ProjectCreator<'a> {
    pub fn new(remote: &'a dyn RemoteClient, reporter: &'a dyn Reporter) -> Self {
        Self { remote, reporter }
    }

    /// Create the project, then persist `target_name -> cluster/projectId` to `.stratarc`.
    ///
    /// The new target becomes the default when no default exists yet. Remote
    /// failures propagate unchanged and leave the local config untouched.
    pub async fn create_project(
        &self,
        env: &mut Environment,
        options: CreateOptions,
    ) -> Result<NamedTarget> {
        let is_local = options.cluster == LOCAL_CLUSTER;
        let name = options.name.unwrap_or_else(placeholder_name);
        let region = if is_local {
            None
        } else {
            options
                .region
                .or_else(|| env.get_region_from_cluster(&options.cluster))
        };
        let definition = ProjectDefinition::template();

        self.reporter.action_start(&format!(
            "Creating service {} in cluster {}",
            name, options.cluster
        ));
        let created = self
            .remote
            .create_project(CreateProjectRequest {
                cluster: &options.cluster,
                name: &name,
                definition: &definition,
                alias: options.alias.as_deref(),
                region: region.as_deref(),
            })
            .await;
        self.reporter.action_stop();
        let project = created?;

        info!(project = %project.id, cluster = %options.cluster, "created project");

        let target = Target::new(options.cluster, project.id);
        env.set_local_target(&options.target_name, target.clone());
        if !env.has_local_default_target() {
            env.set_local_default_target(&options.target_name);
        }
        env.save_local_rc()?;

        Ok(NamedTarget {
            name: options.target_name,
            target,
        })
    }
}
