//! Migration results returned by the push operation.

use serde::{Deserialize, Serialize};

use crate::definition::ProjectDefinition;

/// Error code the API attaches to destructive-change rejections
pub const DESTRUCTIVE_CHANGES_CODE: &str = "DESTRUCTIVE_CHANGES";

/// Description marker of destructive-change rejections from servers that send no code
const DESTRUCTIVE_CHANGES_MARKER: &str = "destructive changes";

/// Outcome of a push.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationResult {
    #[serde(default)]
    pub migration_messages: Vec<MigrationMessage>,
    #[serde(default)]
    pub errors: Vec<MigrationError>,
    /// Server-confirmed definition, present when messages exist
    #[serde(default)]
    pub project_definition: Option<ProjectDefinition>,
}

impl MigrationResult {
    pub fn is_noop(&self) -> bool {
        self.migration_messages.is_empty() && self.errors.is_empty()
    }

    pub fn has_destructive_error(&self) -> bool {
        self.errors.iter().any(MigrationError::is_destructive)
    }
}

/// Human-readable description of one schema change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationMessage {
    /// Kind of element changed, e.g. `Type` or `Field`
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// `Create`, `Update` or `Delete`
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub description: String,
    #[serde(default)]
    pub sub_descriptions: Vec<MigrationMessage>,
}

/// Structured migration error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationError {
    pub description: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl MigrationError {
    /// Whether this error rejects a change that could lose data.
    ///
    /// Uses the error code when present and falls back to the description
    /// marker for servers that predate error codes.
    pub fn is_destructive(&self) -> bool {
        match self.code.as_deref() {
            Some(code) => code == DESTRUCTIVE_CHANGES_CODE,
            None => self.description.contains(DESTRUCTIVE_CHANGES_MARKER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(description: &str, code: Option<&str>) -> MigrationError {
        MigrationError {
            description: description.to_string(),
            code: code.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_destructive_by_code() {
        assert!(error("Field removed", Some(DESTRUCTIVE_CHANGES_CODE)).is_destructive());
        assert!(!error("contains destructive changes", Some("INVALID_TYPE")).is_destructive());
    }

    #[test]
    fn test_destructive_by_description_marker() {
        assert!(
            error("Your migration includes potentially destructive changes.", None)
                .is_destructive()
        );
        assert!(!error("Unknown type Foo", None).is_destructive());
    }

    #[test]
    fn test_deserialize_push_payload() {
        let json = r#"{
            "migrationMessages": [
                {"type": "Type", "action": "Create", "name": "Post",
                 "description": "A new type with the name `Post` is created.",
                 "subDescriptions": [{"description": "field `title`"}]}
            ],
            "errors": [],
            "projectDefinition": {"modules": [{"name": "root", "content": "", "files": {}}]}
        }"#;

        let result: MigrationResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.migration_messages.len(), 1);
        assert_eq!(result.migration_messages[0].kind.as_deref(), Some("Type"));
        assert_eq!(result.migration_messages[0].sub_descriptions.len(), 1);
        assert!(result.project_definition.is_some());
        assert!(!result.is_noop());
    }
}
