//! Watch mode: redeploy whenever the service definition changes on disk.

mod event;
mod runner;
mod source;

pub use event::{ChangeEvent, ChangeKind, WatchOptions, WatchSummary};
pub use runner::WatchLoop;
pub use source::{DirectoryWatcher, watch_directory};
