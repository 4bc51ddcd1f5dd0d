//! Deploy state machine: `Idle -> Deploying -> Idle`, once per cycle.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::definition::DefinitionLoader;
use crate::error::Result;
use crate::remote::{PushRequest, RemoteClient};
use crate::reporter::Reporter;
use crate::types::NamedTarget;

use super::report::{DeployOutcome, DeployReport};
use super::state::DeployState;

const UP_TO_DATE: &str = "Everything up-to-date.";
const HEADER_CREATED: &str = "Success! Created the following service:";
const HEADER_UPDATED: &str = "Success! Here is what changed:";
const HEADER_UPDATED_WITH_ERRORS: &str = "Error! Here are the potential changes:";
const HEADER_DRY_RUN: &str = "Here are the changes that would be applied (dry run):";
const ERRORS_HEADER: &str = "There are issues with the new service definition:";
const DESTRUCTIVE_HINT: &str = "Your changes might result in data loss. Review them with \
`strata deploy --dry-run` or use `strata deploy --force` if you know what you're doing!";

#[derive(Debug, Clone, Copy, Default)]
pub struct DeploySettings {
    /// Apply destructive changes
    pub force: bool,
    /// Compute the migration without applying it
    pub dry_run: bool,
}

/// The project a deploy cycle runs against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployProject {
    pub target: NamedTarget,
    /// Endpoint reported after every cycle
    pub endpoint: String,
    /// The project was created by this invocation and not yet deployed to
    pub is_new: bool,
}

pub struct Orchestrator {
    remote: Arc<dyn RemoteClient>,
    reporter: Arc<dyn Reporter>,
    state: DeployState,
    settings: DeploySettings,
}

impl Orchestrator {
    pub fn new(
        remote: Arc<dyn RemoteClient>,
        reporter: Arc<dyn Reporter>,
        settings: DeploySettings,
    ) -> Self {
        Self {
            remote,
            reporter,
            state: DeployState::new(),
            settings,
        }
    }

    pub fn state(&self) -> &DeployState {
        &self.state
    }

    pub fn is_deploying(&self) -> bool {
        self.state.is_deploying()
    }

    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    pub fn settings(&self) -> DeploySettings {
        self.settings
    }

    /// Deploy the loader's current definition (loading it if none is held).
    ///
    /// Returns a `Skipped` report without doing anything when another deploy
    /// is in flight. Remote failures propagate; the in-flight flag is cleared
    /// on every exit path.
    pub async fn deploy(
        &self,
        project: &DeployProject,
        loader: &mut DefinitionLoader,
    ) -> Result<DeployReport> {
        self.run(project, loader, false).await
    }

    /// Re-read the definition from disk, then deploy it.
    pub async fn reload_and_deploy(
        &self,
        project: &DeployProject,
        loader: &mut DefinitionLoader,
    ) -> Result<DeployReport> {
        self.run(project, loader, true).await
    }

    async fn run(
        &self,
        project: &DeployProject,
        loader: &mut DefinitionLoader,
        reload: bool,
    ) -> Result<DeployReport> {
        let Some(guard) = self.state.try_acquire() else {
            debug!(
                target_name = %project.target.name,
                "deploy already in flight, dropping request"
            );
            return Ok(DeployReport::new(
                DeployOutcome::Skipped,
                &project.target,
                &project.endpoint,
            ));
        };

        let definition = if reload {
            loader.reload()?
        } else {
            loader.ensure_loaded()?
        };

        info!(
            target_name = %project.target.name,
            project = %project.target.target.project_id,
            force = self.settings.force,
            dry_run = self.settings.dry_run,
            "deploying"
        );

        self.reporter.action_start(&format!(
            "Deploying to {} ({})",
            project.target.name, project.target.target
        ));
        let pushed = self
            .remote
            .push(PushRequest {
                target: &project.target.target,
                force: self.settings.force,
                dry_run: self.settings.dry_run,
                definition,
            })
            .await;
        self.reporter.action_stop();
        let result = pushed?;

        let outcome = DeployOutcome::classify(&result, project.is_new, self.settings.dry_run);
        let mut report = DeployReport::new(outcome, &project.target, &project.endpoint);

        if outcome == DeployOutcome::UpToDate {
            self.reporter.log(UP_TO_DATE);
        }

        if !result.migration_messages.is_empty() {
            // Errors win over creation: the header always agrees with the outcome.
            let header = match outcome {
                DeployOutcome::DryRun => HEADER_DRY_RUN,
                DeployOutcome::Created => HEADER_CREATED,
                DeployOutcome::UpdatedWithErrors => HEADER_UPDATED_WITH_ERRORS,
                _ => HEADER_UPDATED,
            };
            self.reporter.log(header);
            self.reporter.print_messages(&result.migration_messages);

            if !self.settings.dry_run {
                match &result.project_definition {
                    Some(confirmed) => loader.set(confirmed.clone()),
                    None => warn!("push returned messages without a project definition"),
                }
            }
        }

        if !result.errors.is_empty() {
            self.reporter.warn(ERRORS_HEADER);
            self.reporter.print_errors(&result.errors);
            if result.has_destructive_error() {
                self.reporter.warn(DESTRUCTIVE_HINT);
                report.destructive = true;
            }
        }

        report.messages = result.migration_messages;
        report.errors = result.errors;

        drop(guard);
        info!(outcome = ?outcome, "deploy finished");
        self.reporter
            .log(&format!("Your GraphQL endpoint: {}", project.endpoint));

        Ok(report)
    }
}
