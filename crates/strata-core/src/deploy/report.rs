//! Deploy outcomes.

use serde::Serialize;

use crate::remote::{MigrationError, MigrationMessage, MigrationResult};
use crate::types::NamedTarget;

/// How a deploy attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployOutcome {
    /// Nothing to migrate
    UpToDate,
    /// First deploy of a freshly created project
    Created,
    /// Existing project migrated without errors
    Updated,
    /// Messages and errors both returned; changes were not applied
    UpdatedWithErrors,
    /// Only errors returned
    Rejected,
    /// Changes computed but not applied
    DryRun,
    /// Another deploy was in flight; nothing was done
    Skipped,
}

impl DeployOutcome {
    /// Classify a push result. Evaluation order: no-op, messages, errors.
    pub fn classify(result: &MigrationResult, is_new: bool, dry_run: bool) -> Self {
        if result.is_noop() {
            return DeployOutcome::UpToDate;
        }
        if !result.migration_messages.is_empty() {
            if dry_run {
                return DeployOutcome::DryRun;
            }
            if !result.errors.is_empty() {
                return DeployOutcome::UpdatedWithErrors;
            }
            return if is_new {
                DeployOutcome::Created
            } else {
                DeployOutcome::Updated
            };
        }
        DeployOutcome::Rejected
    }

    pub fn is_success(self) -> bool {
        !matches!(
            self,
            DeployOutcome::UpdatedWithErrors | DeployOutcome::Rejected
        )
    }
}

/// Result of one deploy cycle
#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    pub outcome: DeployOutcome,
    pub target_name: String,
    pub cluster: String,
    pub project_id: String,
    pub endpoint: String,
    pub messages: Vec<MigrationMessage>,
    pub errors: Vec<MigrationError>,
    /// Whether the force-flag remediation hint was emitted
    pub destructive: bool,
}

impl DeployReport {
    pub fn new(outcome: DeployOutcome, target: &NamedTarget, endpoint: &str) -> Self {
        Self {
            outcome,
            target_name: target.name.clone(),
            cluster: target.target.cluster.clone(),
            project_id: target.target.project_id.clone(),
            endpoint: endpoint.to_string(),
            messages: Vec::new(),
            errors: Vec::new(),
            destructive: false,
        }
    }
}
