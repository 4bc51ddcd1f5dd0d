//! Strata Core Library
//!
//! Provides the deploy client logic for the strata platform: target
//! resolution, project creation, the deploy state machine and watch mode.

pub mod auth;
pub mod commands;
pub mod config;
pub mod context;
pub mod definition;
pub mod deploy;
pub mod environment;
pub mod error;
pub mod names;
pub mod project_file;
pub mod remote;
pub mod reporter;
pub mod types;
pub mod watch;

pub use error::{Result, StrataError};

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ClusterConfig, GlobalConfig, GlobalConfigStore, LocalRc, LocalRcStore};
    pub use crate::context::AppContext;
    pub use crate::environment::Environment;

    // Deploy
    pub use crate::deploy::{
        DeployOutcome, DeployProject, DeployReport, DeploySettings, DeployState, Orchestrator,
        Resolution, ResolveRequest,
    };

    // Definition
    pub use crate::definition::{DefinitionLoader, ProjectDefinition};

    // Remote
    pub use crate::remote::{
        HttpRemoteClient, MigrationError, MigrationMessage, MigrationResult, RemoteClient,
    };

    // Reporting
    pub use crate::reporter::{Reporter, TracingReporter};

    // Types
    pub use crate::types::{NamedTarget, Target};

    pub use crate::error::{Result, StrataError};
}
