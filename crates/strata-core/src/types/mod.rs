//! Shared core types used across configuration and deploy layers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named reference to a remote project: `<cluster>/<projectId>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Target {
    /// Deployment cluster (region/environment) identifier
    pub cluster: String,
    /// Opaque remote project identifier
    pub project_id: String,
}

impl Target {
    pub fn new(cluster: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            project_id: project_id.into(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.cluster, self.project_id)
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((cluster, project_id)) if !cluster.is_empty() && !project_id.is_empty() => {
                Ok(Self::new(cluster.trim(), project_id.trim()))
            }
            _ => Err(format!(
                "Invalid target '{}'. Expected <cluster>/<projectId>",
                s
            )),
        }
    }
}

impl TryFrom<String> for Target {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        target.to_string()
    }
}

/// A target together with the local name it is registered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedTarget {
    pub name: String,
    pub target: Target,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target() {
        let target: Target = "shared-eu-west-1/cj8x2k1lm".parse().unwrap();
        assert_eq!(target.cluster, "shared-eu-west-1");
        assert_eq!(target.project_id, "cj8x2k1lm");
        assert_eq!(target.to_string(), "shared-eu-west-1/cj8x2k1lm");
    }

    #[test]
    fn test_parse_target_invalid() {
        assert!("no-slash".parse::<Target>().is_err());
        assert!("/abc".parse::<Target>().is_err());
        assert!("local/".parse::<Target>().is_err());
    }
}
