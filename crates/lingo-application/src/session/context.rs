use super::controller::SessionInner;
use lingo_core::scene::{Character, Scene, Word};
use lingo_core::session::{DialogueTurn, SessionEvent, SessionState};
use lingo_core::{LingoError, Result};
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;

/// A view's handle onto a running session.
///
/// Cheap to clone. Every call fails with `LingoError::Config` once the
/// owning [`SceneSessionController`](super::SceneSessionController) has been
/// dropped.
#[derive(Clone)]
pub struct SessionContext {
    inner: Weak<SessionInner>,
}

impl SessionContext {
    pub(crate) fn new(inner: Weak<SessionInner>) -> Self {
        Self { inner }
    }

    /// A context that was never attached to a session.
    pub fn detached() -> Self {
        Self { inner: Weak::new() }
    }

    pub fn is_attached(&self) -> bool {
        self.inner.strong_count() > 0
    }

    fn session(&self) -> Result<Arc<SessionInner>> {
        self.inner
            .upgrade()
            .ok_or_else(|| LingoError::config("View is not attached to a live session"))
    }

    /// Fails if the session is gone. Views call this when they are created.
    pub fn ensure_attached(&self) -> Result<()> {
        self.session().map(|_| ())
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub async fn snapshot(&self) -> Result<SessionState> {
        Ok(self.session()?.snapshot().await)
    }

    pub async fn scene(&self) -> Result<Scene> {
        Ok(self.snapshot().await?.scene)
    }

    pub async fn words(&self) -> Result<Vec<Word>> {
        Ok(self.snapshot().await?.words)
    }

    pub async fn turns(&self) -> Result<Vec<DialogueTurn>> {
        Ok(self.snapshot().await?.turns)
    }

    pub async fn selected_role(&self) -> Result<Option<Character>> {
        Ok(self.snapshot().await?.selected_character().cloned())
    }

    pub async fn ai_role(&self) -> Result<Option<Character>> {
        Ok(self.snapshot().await?.ai_character().cloned())
    }

    pub async fn bilingual_mode(&self) -> Result<bool> {
        Ok(self.snapshot().await?.bilingual_mode)
    }

    pub fn subscribe(&self) -> Result<broadcast::Receiver<SessionEvent>> {
        Ok(self.session()?.subscribe())
    }

    // ============================================================================
    // Mutators
    // ============================================================================

    pub async fn select_role(&self, role_id: &str) -> Result<bool> {
        Ok(self.session()?.select_role(role_id).await)
    }

    pub async fn submit_message(&self, text: &str) -> Result<Option<DialogueTurn>> {
        Ok(self.session()?.submit_message(text).await)
    }

    pub async fn toggle_immersive_mode(&self) -> Result<bool> {
        Ok(self.session()?.toggle_immersive_mode().await)
    }

    pub async fn set_bilingual_mode(&self, enabled: bool) -> Result<()> {
        self.session()?.set_bilingual_mode(enabled).await;
        Ok(())
    }

    pub async fn set_show_word_panel(&self, visible: bool) -> Result<()> {
        self.session()?.set_show_word_panel(visible).await;
        Ok(())
    }
}
