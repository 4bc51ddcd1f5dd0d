//! High-level commands for strata operations.
//!
//! This module provides the public API the CLI calls into. Each command
//! takes an [`AppContext`](crate::context::AppContext) and returns a report
//! the frontend renders.

pub mod deploy;
pub mod info;
pub mod logout;

pub use deploy::{DeployCommand, DeployOptions};
pub use info::{InfoCommand, InfoOptions, InfoReport, TargetInfo};
pub use logout::{LogoutCommand, LogoutReport};
