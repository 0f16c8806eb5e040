//! Deferred tasks tied to the lifetime of their owner.
//!
//! Every simulated latency (scene load, AI reply, scoring) runs as a task
//! that sleeps and then applies its update. Cancelling the owner's
//! [`DeferredTasks`] stops all pending sleeps, so a torn-down session never
//! receives a stale update.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// A group of background tasks that share one cancellation token.
#[derive(Debug, Clone, Default)]
pub struct DeferredTasks {
    token: CancellationToken,
    tracker: TaskTracker,
}

impl DeferredTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `task` after `delay` unless the group is cancelled first.
    pub fn schedule<F>(&self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.token.clone();
        self.tracker.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("[Deferred] Task cancelled before firing");
                }
                _ = tokio::time::sleep(delay) => task.await,
            }
        });
    }

    /// Runs `task` immediately, aborting it at its next await point once the
    /// group is cancelled. Used for long-lived watchers.
    pub fn spawn_until_cancelled<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.token.clone();
        self.tracker.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = task => {}
            }
        });
    }

    /// Cancels every pending and running task in the group.
    pub fn cancel_all(&self) {
        self.token.cancel();
        self.tracker.close();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Number of tasks that have not finished yet.
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_schedule_fires_after_delay() {
        let tasks = DeferredTasks::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        tasks.schedule(Duration::from_millis(1500), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(1499)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_drops_pending_tasks() {
        let tasks = DeferredTasks::new();
        let fired = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let counter = fired.clone();
            tasks.schedule(Duration::from_secs(1), async move {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(tasks.pending(), 3);

        tasks.cancel_all();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(tasks.is_cancelled());
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(tasks.pending(), 0);
    }
}
