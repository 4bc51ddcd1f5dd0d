//! Filesystem notifications for a service directory.

use std::path::Path;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, warn};

use crate::error::{Result, StrataError};

use super::event::{ChangeEvent, ChangeKind};

/// Keeps the underlying watcher alive. Dropping it closes the event channel.
pub struct DirectoryWatcher {
    _watcher: RecommendedWatcher,
}

/// Subscribe to changes below `dir`.
///
/// Access notifications are filtered out; every other event is forwarded,
/// one [`ChangeEvent`] per path, to the single returned receiver.
pub fn watch_directory(dir: &Path) -> Result<(DirectoryWatcher, UnboundedReceiver<ChangeEvent>)> {
    let (tx, rx) = mpsc::unbounded_channel();

    let mut watcher = RecommendedWatcher::new(
        move |res: std::result::Result<Event, notify::Error>| match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Access(_)) {
                    return;
                }
                let kind = ChangeKind::from(&event.kind);
                for path in event.paths {
                    let _ = tx.send(ChangeEvent::new(kind, path));
                }
            }
            Err(e) => warn!(error = %e, "file watcher error"),
        },
        Config::default(),
    )
    .map_err(|e| StrataError::Watch(e.to_string()))?;

    watcher
        .watch(dir, RecursiveMode::Recursive)
        .map_err(|e| StrataError::Watch(format!("{}: {}", dir.display(), e)))?;

    debug!(dir = %dir.display(), "watching directory");

    Ok((DirectoryWatcher { _watcher: watcher }, rx))
}
