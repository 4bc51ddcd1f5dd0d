//! Info command: lists the service's targets and their endpoints.

use serde::Serialize;

use crate::context::AppContext;
use crate::types::NamedTarget;

/// Options for the info command
#[derive(Debug, Clone, Default)]
pub struct InfoOptions {
    /// Only show this target
    pub target: Option<String>,
}

impl InfoOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

/// One row of the info listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetInfo {
    pub name: String,
    pub cluster: String,
    pub project_id: String,
    pub endpoint: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InfoReport {
    pub active_cluster: String,
    pub targets: Vec<TargetInfo>,
}

pub struct InfoCommand {
    ctx: AppContext,
}

impl InfoCommand {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    pub fn with_defaults() -> anyhow::Result<Self> {
        Ok(Self::new(AppContext::with_defaults()?))
    }

    /// Execute the info command.
    ///
    /// An explicit target that does not resolve fails with `ServiceNotFound`.
    pub fn execute(&self, options: &InfoOptions) -> anyhow::Result<InfoReport> {
        let env = self.ctx.environment()?;
        let default = env.local_rc().default.clone();

        let named: Vec<NamedTarget> = match &options.target {
            Some(name) => vec![env.require_target(name)?],
            None => env
                .local_rc()
                .targets
                .iter()
                .map(|(name, target)| NamedTarget {
                    name: name.clone(),
                    target: target.clone(),
                })
                .collect(),
        };

        let targets = named
            .into_iter()
            .map(|named| TargetInfo {
                endpoint: env.simple_endpoint(&named.target),
                is_default: default.as_deref() == Some(named.name.as_str()),
                cluster: named.target.cluster,
                project_id: named.target.project_id,
                name: named.name,
            })
            .collect();

        Ok(InfoReport {
            active_cluster: env.active_cluster().to_string(),
            targets,
        })
    }
}
