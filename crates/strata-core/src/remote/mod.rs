//! Remote platform API.

pub mod http;
pub mod migration;

use async_trait::async_trait;

use crate::definition::ProjectDefinition;
use crate::error::Result;
use crate::types::Target;

pub use http::HttpRemoteClient;
pub use migration::{MigrationError, MigrationMessage, MigrationResult};

/// A project allocated by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteProject {
    pub id: String,
    pub name: String,
    pub alias: Option<String>,
    pub region: Option<String>,
}

/// Parameters of a project allocation
#[derive(Debug, Clone)]
pub struct CreateProjectRequest<'a> {
    pub cluster: &'a str,
    pub name: &'a str,
    pub definition: &'a ProjectDefinition,
    pub alias: Option<&'a str>,
    pub region: Option<&'a str>,
}

/// Parameters of a push
#[derive(Debug, Clone)]
pub struct PushRequest<'a> {
    pub target: &'a Target,
    pub force: bool,
    pub dry_run: bool,
    pub definition: &'a ProjectDefinition,
}

/// Operations the deploy flow needs from the platform.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn create_project(&self, request: CreateProjectRequest<'_>) -> Result<RemoteProject>;

    async fn push(&self, request: PushRequest<'_>) -> Result<MigrationResult>;
}
