//! The "deploy in flight" flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::trace;

/// At most one deploy may hold this state at a time.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct DeployState {
    deploying: Arc<AtomicBool>,
}

impl DeployState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_deploying(&self) -> bool {
        self.deploying.load(Ordering::SeqCst)
    }

    /// Set the flag if it is clear. The returned guard clears it on drop.
    pub fn try_acquire(&self) -> Option<DeployGuard> {
        self.deploying
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| {
                trace!("deploy state acquired");
                DeployGuard {
                    deploying: Arc::clone(&self.deploying),
                }
            })
    }
}

/// Held for the duration of one deploy.
#[derive(Debug)]
#[must_use = "the deploy flag is released as soon as the guard is dropped"]
pub struct DeployGuard {
    deploying: Arc<AtomicBool>,
}

impl Drop for DeployGuard {
    fn drop(&mut self) {
        self.deploying.store(false, Ordering::SeqCst);
        trace!("deploy state released");
    }
}
