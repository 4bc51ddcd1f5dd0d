//! Configuration files.
//!
//! Two files are involved:
//! - Global: per-user JSON at `~/.strata/config.json` (auth token, private clusters)
//! - Local: per-service TOML at `./.stratarc` (named targets, default target)

pub mod global;
pub mod local;
pub mod parser;
pub mod paths;

pub use global::{ClusterConfig, GlobalConfig, GlobalConfigStore};
pub use local::{LocalRc, LocalRcStore};
pub use parser::{parse_local_rc_str, to_toml};
pub use paths::{
    CONFIG_PATH_ENV, LOCAL_RC_FILE_NAME, default_global_config_path, global_config_path,
    local_rc_path,
};
