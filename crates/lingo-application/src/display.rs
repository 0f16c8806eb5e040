//! Full-screen capability of the host environment.
//!
//! Immersive mode asks the host to go full screen. The host can also leave
//! full screen on its own (the user pressing Escape, a window manager
//! action), so it publishes every transition on a broadcast channel.

use async_trait::async_trait;
use lingo_core::{LingoError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;

const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// A full-screen transition reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullscreenChange {
    /// Whether the host is full screen after the transition.
    pub active: bool,
}

#[async_trait]
pub trait DisplayEnvironment: Send + Sync {
    /// Asks the host to enter full screen. The host may refuse.
    async fn request_fullscreen(&self) -> Result<()>;

    /// Asks the host to leave full screen.
    async fn exit_fullscreen(&self) -> Result<()>;

    fn is_fullscreen(&self) -> bool;

    /// Subscribes to full-screen transitions, whatever caused them.
    fn subscribe(&self) -> broadcast::Receiver<FullscreenChange>;
}

/// In-memory display used by the terminal front end and by tests.
#[derive(Debug)]
pub struct HeadlessDisplay {
    active: AtomicBool,
    deny_requests: AtomicBool,
    changes: broadcast::Sender<FullscreenChange>,
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            active: AtomicBool::new(false),
            deny_requests: AtomicBool::new(false),
            changes,
        }
    }

    /// Makes subsequent full-screen requests fail.
    pub fn set_deny_requests(&self, deny: bool) {
        self.deny_requests.store(deny, Ordering::SeqCst);
    }

    /// Leaves full screen without going through the session, as the host would
    /// when the user presses Escape.
    pub fn simulate_external_exit(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            tracing::debug!("[Display] Full screen left externally");
            self.notify(false);
        }
    }

    fn notify(&self, active: bool) {
        // No receivers is fine: nobody is watching yet.
        let _ = self.changes.send(FullscreenChange { active });
    }
}

impl Default for HeadlessDisplay {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DisplayEnvironment for HeadlessDisplay {
    async fn request_fullscreen(&self) -> Result<()> {
        if self.deny_requests.load(Ordering::SeqCst) {
            return Err(LingoError::resource("Full screen request was denied"));
        }
        if !self.active.swap(true, Ordering::SeqCst) {
            self.notify(true);
        }
        Ok(())
    }

    async fn exit_fullscreen(&self) -> Result<()> {
        if self.active.swap(false, Ordering::SeqCst) {
            self.notify(false);
        }
        Ok(())
    }

    fn is_fullscreen(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn subscribe(&self) -> broadcast::Receiver<FullscreenChange> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transitions_are_broadcast() {
        let display = HeadlessDisplay::new();
        let mut changes = display.subscribe();

        display.request_fullscreen().await.unwrap();
        assert!(display.is_fullscreen());
        assert_eq!(changes.recv().await.unwrap(), FullscreenChange { active: true });

        display.simulate_external_exit();
        assert!(!display.is_fullscreen());
        assert_eq!(changes.recv().await.unwrap(), FullscreenChange { active: false });
    }

    #[tokio::test]
    async fn test_denied_request_stays_windowed() {
        let display = HeadlessDisplay::new();
        display.set_deny_requests(true);

        let err = display.request_fullscreen().await.unwrap_err();
        assert!(err.is_resource());
        assert!(!display.is_fullscreen());
    }
}
