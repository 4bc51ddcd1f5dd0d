//! Deploy reconciliation: resolve the target, create the project if needed,
//! push the definition and report the migration.

pub mod creator;
pub mod orchestrator;
pub mod report;
pub mod resolver;
pub mod state;

pub use creator::{CreateOptions, ProjectCreator};
pub use orchestrator::{DeployProject, DeploySettings, Orchestrator};
pub use report::{DeployOutcome, DeployReport};
pub use resolver::{Resolution, ResolveRequest, resolve};
pub use state::{DeployGuard, DeployState};
