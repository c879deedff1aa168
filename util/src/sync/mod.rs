//! Thin re-exports over `tokio::sync` primitives. Kept as its own module
//! (rather than importing `tokio::sync` directly everywhere) so the
//! protocol crates can be pointed at a different executor's primitives
//! without touching call sites, matching the teacher's convention.
pub use tokio::sync::{Mutex, RwLock};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// A cooperative cancellation signal: `cancel()` is idempotent and every
/// outstanding `cancelled().await` resolves once it fires. Used by `close()`
/// paths (spec.md §5) to interrupt in-flight timers/reads.
#[derive(Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken {
            cancelled: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        }
    }

    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        self.notify.notified().await;
    }
}
