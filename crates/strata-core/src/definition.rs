//! Service definition: the desired state pushed to the platform.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, StrataError};
use crate::project_file::PROJECT_FILE_NAME;

/// Name of the root module
pub const ROOT_MODULE: &str = "root";

/// File extensions attached to the root module
const MODULE_FILE_EXTENSIONS: [&str; 3] = ["graphql", "js", "ts"];

const ENV_PLACEHOLDER_OPEN: &str = "${env:";

/// Local service definition (schema + metadata), in the shape the API expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDefinition {
    #[serde(default)]
    pub modules: Vec<ModuleDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDefinition {
    pub name: String,
    /// Content of the module's project file
    pub content: String,
    /// Additional files keyed by path relative to the service directory
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

impl ProjectDefinition {
    /// Definition sent when allocating a fresh project: a single empty root module.
    pub fn template() -> Self {
        Self {
            modules: vec![ModuleDefinition {
                name: ROOT_MODULE.to_string(),
                content: String::new(),
                files: BTreeMap::new(),
            }],
        }
    }

    pub fn root(&self) -> Option<&ModuleDefinition> {
        self.modules.iter().find(|m| m.name == ROOT_MODULE)
    }
}

/// Loads the definition of a service directory and holds it in memory.
#[derive(Debug, Clone)]
pub struct DefinitionLoader {
    service_dir: PathBuf,
    definition: Option<ProjectDefinition>,
}

impl DefinitionLoader {
    pub fn new(service_dir: impl Into<PathBuf>) -> Self {
        Self {
            service_dir: service_dir.into(),
            definition: None,
        }
    }

    pub fn service_dir(&self) -> &Path {
        &self.service_dir
    }

    pub fn project_file_path(&self) -> PathBuf {
        self.service_dir.join(PROJECT_FILE_NAME)
    }

    /// Current in-memory definition, if one was loaded or set.
    pub fn definition(&self) -> Option<&ProjectDefinition> {
        self.definition.as_ref()
    }

    /// Read the project file and module files from disk, replacing the current definition.
    pub fn load(&mut self) -> Result<()> {
        let project_file = self.project_file_path();
        let content = std::fs::read_to_string(&project_file)
            .map_err(|e| StrataError::io(&project_file, e))?;

        let mut files = BTreeMap::new();
        collect_module_files(&self.service_dir, &self.service_dir, &mut files)?;

        debug!(
            dir = %self.service_dir.display(),
            files = files.len(),
            "loaded service definition"
        );

        self.definition = Some(ProjectDefinition {
            modules: vec![ModuleDefinition {
                name: ROOT_MODULE.to_string(),
                content,
                files,
            }],
        });
        Ok(())
    }

    /// The current definition, loading it from disk first if none is held.
    pub fn ensure_loaded(&mut self) -> Result<&ProjectDefinition> {
        if self.definition.is_none() {
            self.load()?;
            self.inject_environment();
        }
        Ok(self.definition.get_or_insert_with(ProjectDefinition::default))
    }

    /// Re-read the definition from disk, discarding the in-memory one.
    pub fn reload(&mut self) -> Result<&ProjectDefinition> {
        self.load()?;
        self.inject_environment();
        Ok(self.definition.get_or_insert_with(ProjectDefinition::default))
    }

    /// Substitute `${env:NAME}` placeholders from the process environment.
    pub fn inject_environment(&mut self) {
        self.inject_environment_with(|name| std::env::var(name).ok());
    }

    /// Substitute `${env:NAME}` placeholders using `lookup`.
    ///
    /// Placeholders whose variable is unset are left untouched.
    pub fn inject_environment_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let Some(definition) = self.definition.as_mut() else {
            return;
        };
        for module in &mut definition.modules {
            module.content = substitute_env(&module.content, &lookup);
            for content in module.files.values_mut() {
                *content = substitute_env(content, &lookup);
            }
        }
    }

    /// Replace the in-memory definition.
    pub fn set(&mut self, definition: ProjectDefinition) {
        self.definition = Some(definition);
    }
}

fn collect_module_files(
    root: &Path,
    dir: &Path,
    files: &mut BTreeMap<String, String>,
) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| StrataError::io(dir, e))?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    paths.sort();

    for path in paths {
        let skipped = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(is_skipped_name)
            .unwrap_or(true);
        if skipped {
            continue;
        }

        if path.is_dir() {
            collect_module_files(root, &path, files)?;
        } else if is_module_file(&path) {
            let content =
                std::fs::read_to_string(&path).map_err(|e| StrataError::io(&path, e))?;
            let relative = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            files.insert(relative, content);
        }
    }
    Ok(())
}

/// Whether a change to `path` affects the service definition.
///
/// `path` is relative to the service directory. Files below hidden
/// directories or `node_modules` are never loaded, so they never count.
pub fn is_definition_file(path: &Path) -> bool {
    let skipped = path.components().any(|c| match c {
        Component::Normal(name) => name.to_str().map(is_skipped_name).unwrap_or(true),
        _ => false,
    });
    if skipped {
        return false;
    }
    path.file_name().map(|n| n == PROJECT_FILE_NAME).unwrap_or(false) || is_module_file(path)
}

fn is_skipped_name(name: &str) -> bool {
    name.starts_with('.') || name == "node_modules"
}

/// Whether a path is attached to the root module as an extra file.
pub fn is_module_file(path: &Path) -> bool {
    if path.file_name().map(|n| n == PROJECT_FILE_NAME).unwrap_or(false) {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| MODULE_FILE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

fn substitute_env(input: &str, lookup: &impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find(ENV_PLACEHOLDER_OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + ENV_PLACEHOLDER_OPEN.len()..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match lookup(name) {
            Some(value) => out.push_str(&value),
            None => {
                warn!(variable = name, "environment variable not set, leaving placeholder");
                out.push_str(&rest[start..start + ENV_PLACEHOLDER_OPEN.len() + end + 1]);
            }
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}
