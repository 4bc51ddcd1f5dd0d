//! Deploy command implementation.
//!
//! Resolves the target, creates the remote project when none exists, pushes
//! the service definition and optionally keeps redeploying on file changes.

use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info};

use crate::auth::ensure_auth;
use crate::context::AppContext;
use crate::definition::DefinitionLoader;
use crate::deploy::{
    CreateOptions, DeployProject, DeployReport, DeploySettings, Orchestrator, ProjectCreator,
    Resolution, ResolveRequest, resolve,
};
use crate::project_file;
use crate::remote::RemoteClient;
use crate::reporter::Reporter;
use crate::watch::{WatchLoop, WatchOptions, WatchSummary, watch_directory};

/// Options for the deploy command
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    /// Target name or `<cluster>/<projectId>`
    pub target: Option<String>,
    /// Create a new service with this name
    pub new_service: Option<String>,
    /// Cluster for the new service
    pub new_service_cluster: Option<String>,
    /// Alias for a newly created service
    pub alias: Option<String>,
    /// Accept destructive changes
    pub force: bool,
    /// Keep redeploying on file changes
    pub watch: bool,
    /// Compute the migration without applying it
    pub dry_run: bool,
}

impl DeployOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target name
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Request a new service with the given name
    pub fn with_new_service(mut self, name: impl Into<String>) -> Self {
        self.new_service = Some(name.into());
        self
    }

    /// Set the cluster for a new service
    pub fn with_new_service_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.new_service_cluster = Some(cluster.into());
        self
    }

    /// Set the alias for a new service
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Set the force flag
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Set the watch flag
    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    /// Set the dry-run flag
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn resolve_request(&self) -> ResolveRequest {
        ResolveRequest {
            target: self.target.clone(),
            new_service: self.new_service.clone(),
            new_service_cluster: self.new_service_cluster.clone(),
        }
    }

    fn settings(&self) -> DeploySettings {
        DeploySettings {
            force: self.force,
            dry_run: self.dry_run,
        }
    }
}

/// Deploy command orchestrator
pub struct DeployCommand {
    ctx: AppContext,
    reporter: Arc<dyn Reporter>,
    remote: Option<Arc<dyn RemoteClient>>,
    watch_options: WatchOptions,
}

impl DeployCommand {
    pub fn new(ctx: AppContext, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            ctx,
            reporter,
            remote: None,
            watch_options: WatchOptions::default(),
        }
    }

    /// Use `remote` instead of the HTTP client derived from the environment.
    pub fn with_remote(mut self, remote: Arc<dyn RemoteClient>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_watch_options(mut self, options: WatchOptions) -> Self {
        self.watch_options = options;
        self
    }

    /// Execute the deploy command.
    ///
    /// Returns the report of the initial deploy. With `watch` set this only
    /// returns once the file watcher shuts down.
    pub async fn execute(&self, options: &DeployOptions) -> anyhow::Result<DeployReport> {
        let mut env = self.ctx.environment()?;

        let resolution = resolve(&env, &options.resolve_request())?;
        let cluster = env.set_active_cluster(resolution.cluster())?;
        ensure_auth(&env, &cluster)?;

        let service_dir = self.ctx.service_dir().display().to_string();
        let mut loader = self.ctx.definition_loader();
        loader
            .ensure_loaded()
            .with_context(|| format!("Failed to load service in {}", service_dir))?;

        let remote = match &self.remote {
            Some(remote) => Arc::clone(remote),
            None => Arc::new(self.ctx.remote_client(&env)?) as Arc<dyn RemoteClient>,
        };

        let (target, is_new) = match resolution {
            Resolution::Existing(named) => (named, false),
            Resolution::New {
                target_name,
                cluster,
                service_name,
            } => {
                let creator = ProjectCreator::new(remote.as_ref(), self.reporter.as_ref());
                let named = creator
                    .create_project(
                        &mut env,
                        CreateOptions {
                            target_name,
                            cluster,
                            name: service_name,
                            alias: options.alias.clone(),
                            region: None,
                        },
                    )
                    .await?;

                let project_file_path = loader.project_file_path();
                project_file::write_project_id(&project_file_path, &named.target.project_id)?;
                loader.reload()?;
                debug!(path = %project_file_path.display(), "recorded project id");
                (named, true)
            }
        };

        let mut project = DeployProject {
            endpoint: env.simple_endpoint(&target.target),
            target,
            is_new,
        };

        let orchestrator =
            Orchestrator::new(remote, Arc::clone(&self.reporter), options.settings());
        let report = orchestrator.deploy(&project, &mut loader).await?;

        if options.watch {
            let summary = self.watch(&orchestrator, &mut project, &mut loader).await?;
            info!(deploys = summary.deploys, "watch mode finished");
        }

        Ok(report)
    }

    async fn watch(
        &self,
        orchestrator: &Orchestrator,
        project: &mut DeployProject,
        loader: &mut DefinitionLoader,
    ) -> anyhow::Result<WatchSummary> {
        let (_watcher, events) = watch_directory(self.ctx.service_dir())?;
        project.is_new = false;
        Ok(WatchLoop::new(events, self.watch_options)
            .run(orchestrator, project, loader)
            .await)
    }
}
