//! Redeploy loop driven by file-change events.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::{Instant, timeout, timeout_at};
use tracing::{debug, info};

use crate::definition::{DefinitionLoader, is_definition_file};
use crate::deploy::{DeployProject, Orchestrator};

use super::event::{ChangeEvent, WatchOptions, WatchSummary};

const WATCHING: &str = "Watching for changes...";

/// Consumes change events and redeploys once per burst.
///
/// The loop is the channel's only consumer, so at most one deploy runs at a
/// time. Events queued while a deploy is in flight are discarded when it
/// finishes instead of triggering another cycle.
pub struct WatchLoop {
    events: UnboundedReceiver<ChangeEvent>,
    options: WatchOptions,
}

impl WatchLoop {
    pub fn new(events: UnboundedReceiver<ChangeEvent>, options: WatchOptions) -> Self {
        Self { events, options }
    }

    /// Run until the event channel closes.
    ///
    /// A failed cycle is reported and the loop keeps watching.
    pub async fn run(
        mut self,
        orchestrator: &Orchestrator,
        project: &mut DeployProject,
        loader: &mut DefinitionLoader,
    ) -> WatchSummary {
        let mut summary = WatchSummary::default();
        let reporter = orchestrator.reporter();
        let roots = watch_roots(loader.service_dir());

        self.skip_startup_snapshot().await;
        reporter.log(WATCHING);

        while let Some(event) = self.next_trigger(&roots).await {
            debug!(path = %event.path.display(), kind = ?event.kind, "definition changed");
            self.settle().await;

            // The deploy is awaited here, so events sent meanwhile stay queued
            // in the channel until `drain` discards them.
            summary.deploys += 1;
            if let Err(e) = orchestrator.reload_and_deploy(project, loader).await {
                summary.failures += 1;
                reporter.error(&e);
            }
            project.is_new = false;

            let dropped = self.drain();
            if dropped > 0 {
                debug!(dropped, "discarded changes received during deploy");
            }
            summary.dropped += dropped;
            reporter.log(WATCHING);
        }

        info!(
            deploys = summary.deploys,
            failures = summary.failures,
            dropped = summary.dropped,
            "watch stopped"
        );
        summary
    }

    /// Discard the notifications a fresh subscription emits for existing files.
    async fn skip_startup_snapshot(&mut self) {
        if self.options.startup_grace.is_zero() {
            return;
        }
        let deadline = Instant::now() + self.options.startup_grace;
        while let Ok(Some(_)) = timeout_at(deadline, self.events.recv()).await {}
    }

    /// Wait for the next event that touches the service definition.
    async fn next_trigger(&mut self, roots: &[PathBuf]) -> Option<ChangeEvent> {
        while let Some(event) = self.events.recv().await {
            let relative = roots
                .iter()
                .find_map(|root| event.path.strip_prefix(root).ok())
                .unwrap_or(event.path.as_path());
            if is_definition_file(relative) {
                return Some(event);
            }
        }
        None
    }

    /// Absorb the rest of a burst: return once no event arrived for `debounce`.
    async fn settle(&mut self) {
        while let Ok(Some(_)) = timeout(self.options.debounce, self.events.recv()).await {}
    }

    fn drain(&mut self) -> usize {
        let mut dropped = 0;
        loop {
            match self.events.try_recv() {
                Ok(_) => dropped += 1,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return dropped,
            }
        }
    }
}

/// Prefixes stripped from event paths. Notification backends may report the
/// canonical form of the service directory.
fn watch_roots(service_dir: &Path) -> Vec<PathBuf> {
    let mut roots = vec![service_dir.to_path_buf()];
    if let Ok(canonical) = std::fs::canonicalize(service_dir)
        && canonical != service_dir
    {
        roots.push(canonical);
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watch::ChangeKind;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn options() -> WatchOptions {
        WatchOptions {
            debounce: Duration::from_millis(20),
            startup_grace: Duration::from_millis(50),
        }
    }

    #[tokio::test]
    async fn test_startup_snapshot_is_skipped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut watch = WatchLoop::new(rx, options());

        tx.send(ChangeEvent::new(ChangeKind::Created, "project.strata"))
            .unwrap();
        watch.skip_startup_snapshot().await;

        assert!(matches!(watch.events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_next_trigger_ignores_unrelated_files() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut watch = WatchLoop::new(rx, options());

        tx.send(ChangeEvent::new(ChangeKind::Modified, "README.md"))
            .unwrap();
        tx.send(ChangeEvent::new(ChangeKind::Modified, "types.graphql"))
            .unwrap();
        drop(tx);

        let event = watch.next_trigger(&[]).await.unwrap();
        assert_eq!(event.path.to_str(), Some("types.graphql"));
        assert!(watch.next_trigger(&[]).await.is_none());
    }

    #[tokio::test]
    async fn test_next_trigger_matches_below_root_only() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut watch = WatchLoop::new(rx, options());
        let root = PathBuf::from("/home/dev/.projects/blog");

        tx.send(ChangeEvent::new(
            ChangeKind::Modified,
            root.join("node_modules/lib/index.js"),
        ))
        .unwrap();
        tx.send(ChangeEvent::new(ChangeKind::Modified, root.join("project.strata")))
            .unwrap();
        drop(tx);

        let event = watch.next_trigger(&[root.clone()]).await.unwrap();
        assert_eq!(event.path, root.join("project.strata"));
        assert!(watch.next_trigger(&[root]).await.is_none());
    }

    #[tokio::test]
    async fn test_drain_counts_pending() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut watch = WatchLoop::new(rx, options());

        for _ in 0..3 {
            tx.send(ChangeEvent::new(ChangeKind::Modified, "project.strata"))
                .unwrap();
        }

        assert_eq!(watch.drain(), 3);
        assert_eq!(watch.drain(), 0);
    }
}
