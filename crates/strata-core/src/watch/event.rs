//! File-change events and watch settings.

use std::path::PathBuf;
use std::time::Duration;

/// Kind of filesystem change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
    Other,
}

impl From<&notify::EventKind> for ChangeKind {
    fn from(kind: &notify::EventKind) -> Self {
        match kind {
            notify::EventKind::Create(_) => ChangeKind::Created,
            notify::EventKind::Modify(_) => ChangeKind::Modified,
            notify::EventKind::Remove(_) => ChangeKind::Removed,
            _ => ChangeKind::Other,
        }
    }
}

/// One `(eventType, path)` notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub path: PathBuf,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// FSEvents may deliver writes made just before the stream started. inotify
/// and ReadDirectoryChangesW only report changes after subscribing.
const STARTUP_GRACE: Duration = if cfg!(target_os = "macos") {
    Duration::from_millis(250)
} else {
    Duration::ZERO
};

/// Watch loop settings
#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    /// Quiet period that ends a burst of changes
    pub debounce: Duration,
    /// Events received this soon after subscribing belong to the initial snapshot
    pub startup_grace: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(100),
            startup_grace: STARTUP_GRACE,
        }
    }
}

/// Counters for a finished watch loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchSummary {
    /// Deploy cycles started
    pub deploys: usize,
    /// Cycles that ended in an error
    pub failures: usize,
    /// Change events dropped because a deploy was in flight
    pub dropped: usize,
}
