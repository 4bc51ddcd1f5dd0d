//! Session check performed before any remote call.

use tracing::debug;

use crate::environment::Environment;
use crate::error::{Result, StrataError};

/// Environment variable holding a platform token
pub const TOKEN_ENV: &str = "STRATA_TOKEN";

/// Token from `STRATA_TOKEN`, ignoring empty values.
pub fn token_from_env() -> Option<String> {
    std::env::var(TOKEN_ENV)
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Make sure a token is available for `cluster` and return it.
pub fn ensure_auth(env: &Environment, cluster: &str) -> Result<String> {
    match env.token_for_cluster(cluster) {
        Some(token) if !token.is_empty() => {
            debug!(cluster, "authenticated");
            Ok(token)
        }
        _ => Err(StrataError::Auth(format!(
            "no token for cluster '{}'. Set {} or add a token to {}",
            cluster,
            TOKEN_ENV,
            env.global_store().path().display()
        ))),
    }
}
