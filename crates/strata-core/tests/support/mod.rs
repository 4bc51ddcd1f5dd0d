#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use strata_core::definition::{ModuleDefinition, ProjectDefinition};
use strata_core::remote::{
    CreateProjectRequest, MigrationError, MigrationMessage, MigrationResult, PushRequest,
    RemoteClient, RemoteProject,
};
use strata_core::reporter::Reporter;
use strata_core::{Result, StrataError};

pub const PROJECT_SCHEMA: &str = "type User {\n  id: ID!\n}\n";

/// Write a minimal service directory.
pub fn write_service(dir: &Path, project_id: Option<&str>) {
    let content = match project_id {
        Some(id) => format!("# project: {id}\n\n{PROJECT_SCHEMA}"),
        None => PROJECT_SCHEMA.to_string(),
    };
    std::fs::write(dir.join("project.strata"), content).unwrap();
}

pub fn message(description: &str) -> MigrationMessage {
    MigrationMessage {
        action: Some("Create".to_string()),
        description: description.to_string(),
        ..Default::default()
    }
}

pub fn error(description: &str) -> MigrationError {
    MigrationError {
        description: description.to_string(),
        ..Default::default()
    }
}

pub fn confirmed_definition(content: &str) -> ProjectDefinition {
    ProjectDefinition {
        modules: vec![ModuleDefinition {
            name: "root".to_string(),
            content: content.to_string(),
            files: Default::default(),
        }],
    }
}

/// Scripted in-memory platform.
///
/// Pushes answer from a queue (an empty queue answers "up to date"); a
/// `None` entry fails the push with a remote error.
#[derive(Default)]
pub struct MockRemote {
    pushes: Mutex<VecDeque<Option<MigrationResult>>>,
    pushed: Mutex<Vec<ProjectDefinition>>,
    push_count: AtomicUsize,
    create_count: AtomicUsize,
    project_id: Option<String>,
    fail_create: bool,
    delay: Duration,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project_id(mut self, id: &str) -> Self {
        self.project_id = Some(id.to_string());
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// Hold every push for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn then_push(self, result: MigrationResult) -> Self {
        self.pushes.lock().unwrap().push_back(Some(result));
        self
    }

    pub fn then_push_failure(self) -> Self {
        self.pushes.lock().unwrap().push_back(None);
        self
    }

    pub fn push_count(&self) -> usize {
        self.push_count.load(Ordering::SeqCst)
    }

    pub fn create_count(&self) -> usize {
        self.create_count.load(Ordering::SeqCst)
    }

    pub fn pushed(&self) -> Vec<ProjectDefinition> {
        self.pushed.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteClient for MockRemote {
    async fn create_project(&self, request: CreateProjectRequest<'_>) -> Result<RemoteProject> {
        self.create_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_create {
            return Err(StrataError::Remote {
                operation: "addProject".to_string(),
                message: "service unavailable".to_string(),
            });
        }
        Ok(RemoteProject {
            id: self.project_id.clone().unwrap_or_else(|| "cjnew1".to_string()),
            name: request.name.to_string(),
            alias: request.alias.map(str::to_string),
            region: request.region.map(str::to_string),
        })
    }

    async fn push(&self, request: PushRequest<'_>) -> Result<MigrationResult> {
        self.push_count.fetch_add(1, Ordering::SeqCst);
        self.pushed.lock().unwrap().push(request.definition.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let next = self.pushes.lock().unwrap().pop_front();
        match next {
            Some(Some(result)) => Ok(result),
            Some(None) => Err(StrataError::Remote {
                operation: "push".to_string(),
                message: "connection reset".to_string(),
            }),
            None => Ok(MigrationResult::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Log(String),
    Warn(String),
    Error(String),
    ActionStart(String),
    ActionStop,
    Messages(usize),
    Errors(usize),
}

/// Reporter that records everything it is asked to print.
#[derive(Default)]
pub struct RecordingReporter {
    entries: Mutex<Vec<Entry>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn logs(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                Entry::Log(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                Entry::Warn(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                Entry::Error(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, entry: Entry) {
        self.entries.lock().unwrap().push(entry);
    }
}

impl Reporter for RecordingReporter {
    fn log(&self, text: &str) {
        self.record(Entry::Log(text.to_string()));
    }

    fn warn(&self, text: &str) {
        self.record(Entry::Warn(text.to_string()));
    }

    fn error(&self, error: &dyn std::error::Error) {
        self.record(Entry::Error(error.to_string()));
    }

    fn action_start(&self, text: &str) {
        self.record(Entry::ActionStart(text.to_string()));
    }

    fn action_stop(&self) {
        self.record(Entry::ActionStop);
    }

    fn print_messages(&self, messages: &[MigrationMessage]) {
        self.record(Entry::Messages(messages.len()));
    }

    fn print_errors(&self, errors: &[MigrationError]) {
        self.record(Entry::Errors(errors.len()));
    }
}
