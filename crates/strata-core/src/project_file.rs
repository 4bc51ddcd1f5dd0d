//! Project file (`project.strata`) read/write helpers.
//!
//! The project file is line oriented:
//!
//! ```text
//! # project: cj8x2k1lm00001
//! # version: 3
//!
//! type User { id: ID! }
//! ```
//!
//! Missing or malformed header lines read back as `None`, never as errors.

use std::path::Path;

use crate::error::{Result, StrataError};

/// Default file name of the project file inside a service directory
pub const PROJECT_FILE_NAME: &str = "project.strata";

const PROJECT_PREFIX: &str = "# project:";
const VERSION_PREFIX: &str = "# version:";
const SCHEMA_TOKEN: &str = "type";

/// Read the project id from project file content.
pub fn read_project_id(content: &str) -> Option<String> {
    read_header(content, PROJECT_PREFIX)
}

/// Read the version from project file content.
pub fn read_version(content: &str) -> Option<String> {
    read_header(content, VERSION_PREFIX)
}

/// Return the schema text: everything from the first line opening with a
/// `type` declaration to the end.
///
/// Returns an empty string when the content has no such line.
pub fn extract_schema(content: &str) -> &str {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let is_declaration = trimmed
            .strip_prefix(SCHEMA_TOKEN)
            .is_some_and(|rest| rest.starts_with(char::is_whitespace));
        if is_declaration {
            return &content[offset + line.len() - trimmed.len()..];
        }
        offset += line.len();
    }
    ""
}

/// Render project file content from its parts.
pub fn render(project_id: &str, version: Option<&str>, schema: &str) -> String {
    let mut out = format!("{PROJECT_PREFIX} {project_id}\n");
    if let Some(version) = version {
        out.push_str(&format!("{VERSION_PREFIX} {version}\n"));
    }
    out.push('\n');
    out.push_str(schema);
    if !schema.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Read the project id from a project file on disk.
///
/// A missing file is a "not found" outcome and yields `Ok(None)`.
pub fn read_project_id_from_file(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|e| StrataError::io(path, e))?;
    Ok(read_project_id(&content))
}

/// Write a project file to disk.
pub fn write(path: &Path, project_id: &str, version: Option<&str>, schema: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| StrataError::io(parent, e))?;
    }
    std::fs::write(path, render(project_id, version, schema))
        .map_err(|e| StrataError::io(path, e))
}

/// Rewrite the id header of an existing project file.
///
/// Only the `# project:` line changes. It is inserted at the top when the file
/// has none; every other line is kept as is.
pub fn write_project_id(path: &Path, project_id: &str) -> Result<()> {
    let content = std::fs::read_to_string(path).map_err(|e| StrataError::io(path, e))?;
    std::fs::write(path, set_project_id(&content, project_id))
        .map_err(|e| StrataError::io(path, e))
}

/// Replace or insert the `# project:` line in project file content.
pub fn set_project_id(content: &str, project_id: &str) -> String {
    let header = format!("{PROJECT_PREFIX} {project_id}");
    let mut out = String::with_capacity(content.len() + header.len() + 1);
    let mut replaced = false;

    for line in content.split_inclusive('\n') {
        if !replaced && line.trim_start().starts_with(PROJECT_PREFIX) {
            out.push_str(&header);
            if line.ends_with("\r\n") {
                out.push_str("\r\n");
            } else if line.ends_with('\n') {
                out.push('\n');
            }
            replaced = true;
        } else {
            out.push_str(line);
        }
    }

    if replaced {
        out
    } else {
        format!("{header}\n{content}")
    }
}

fn read_header(content: &str, prefix: &str) -> Option<String> {
    let value = content
        .lines()
        .find_map(|line| line.trim_start().strip_prefix(prefix))?
        .trim();

    if is_lower_alphanumeric(value) {
        Some(value.to_string())
    } else {
        None
    }
}

fn is_lower_alphanumeric(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_project_id() {
        let content = "# project: abc123\n# version: 2\n\ntype User { id: ID! }\n";
        assert_eq!(read_project_id(content), Some("abc123".to_string()));
        assert_eq!(read_version(content), Some("2".to_string()));
    }

    #[test]
    fn test_read_project_id_missing_line() {
        assert_eq!(read_project_id("type User { id: ID! }"), None);
    }

    #[test]
    fn test_read_project_id_malformed() {
        assert_eq!(read_project_id("# project: ABC-123\n"), None);
        assert_eq!(read_project_id("# project:\n"), None);
    }

    #[test]
    fn test_version_is_optional() {
        assert_eq!(read_version("# project: abc\ntype A { id: ID! }"), None);
    }

    #[test]
    fn test_extract_schema_starts_at_first_type() {
        let content = "# project: abc\n\ntype Post { id: ID! }\ntype User { id: ID! }";
        assert_eq!(
            extract_schema(content),
            "type Post { id: ID! }\ntype User { id: ID! }"
        );
    }

    #[test]
    fn test_extract_schema_skips_type_inside_words() {
        let content = "# Blog prototype service\n\ntype User { id: ID! }\n";
        assert_eq!(extract_schema(content), "type User { id: ID! }\n");
    }

    #[test]
    fn test_extract_schema_without_type_is_empty() {
        assert_eq!(extract_schema("# project: abc\n"), "");
    }

    #[test]
    fn test_write_then_read_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(PROJECT_FILE_NAME);

        write(&path, "abc123", None, "type User { id: ID! }").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(read_project_id(&content), Some("abc123".to_string()));
        assert!(extract_schema(&content).starts_with("type User"));
    }

    #[test]
    fn test_read_project_id_from_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.strata");
        assert_eq!(read_project_id_from_file(&path).unwrap(), None);
    }

    #[test]
    fn test_set_project_id_replaces_only_the_header_line() {
        let content = "# Blog\n# project: old1\n# version: 2\n\ntype User { id: ID! }\n";
        assert_eq!(
            set_project_id(content, "new2"),
            "# Blog\n# project: new2\n# version: 2\n\ntype User { id: ID! }\n"
        );
    }

    #[test]
    fn test_set_project_id_inserts_header_when_missing() {
        assert_eq!(
            set_project_id("type User { id: ID! }", "abc"),
            "# project: abc\ntype User { id: ID! }"
        );
        assert_eq!(set_project_id("", "abc"), "# project: abc\n");
    }

    #[test]
    fn test_write_project_id_keeps_schema_and_version() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(PROJECT_FILE_NAME);
        write(&path, "old1", Some("4"), "type User { id: ID! }\n").unwrap();

        write_project_id(&path, "new2").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(read_project_id(&content), Some("new2".to_string()));
        assert_eq!(read_version(&content), Some("4".to_string()));
        assert_eq!(extract_schema(&content), "type User { id: ID! }\n");
    }
}
