use super::context::SessionContext;
use crate::deferred::DeferredTasks;
use crate::display::DisplayEnvironment;
use crate::reply::ReplyGenerator;
use lingo_core::config::{LingoConfig, SessionDefaults, TimingConfig};
use lingo_core::scene::{SceneCatalog, opening_script};
use lingo_core::session::{
    DialogueTurn, NoticeLevel, Sender, SessionEvent, SessionState,
};
use lingo_core::{LingoError, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{RwLock, broadcast};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Everything a session needs besides the scene itself.
#[derive(Clone)]
pub struct SessionOptions {
    pub timing: TimingConfig,
    pub defaults: SessionDefaults,
    pub replies: Arc<ReplyGenerator>,
    pub display: Arc<dyn DisplayEnvironment>,
}

impl SessionOptions {
    pub fn from_config(config: &LingoConfig, display: Arc<dyn DisplayEnvironment>) -> Self {
        Self {
            timing: config.timing.clone(),
            defaults: config.session.clone(),
            replies: Arc::new(ReplyGenerator::new(config.reply_seed)),
            display,
        }
    }
}

/// State shared between the controller, its contexts and its deferred tasks.
///
/// Only the controller holds a strong reference. Contexts and tasks hold
/// `Weak` handles and give up once the controller is gone.
pub(crate) struct SessionInner {
    state: RwLock<SessionState>,
    events: broadcast::Sender<SessionEvent>,
    replies: Arc<ReplyGenerator>,
    display: Arc<dyn DisplayEnvironment>,
    tasks: DeferredTasks,
    timing: TimingConfig,
    /// Bumped every time the dialogue is reseeded. Only changed while the
    /// state write lock is held.
    generation: AtomicU64,
}

impl SessionInner {
    fn publish(&self, event: SessionEvent) {
        // Nobody listening is not an error.
        let _ = self.events.send(event);
    }

    fn notify(&self, level: NoticeLevel, message: impl Into<String>) {
        self.publish(SessionEvent::notice(level, message));
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub(crate) async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub(crate) async fn select_role(&self, role_id: &str) -> bool {
        let mut state = self.state.write().await;
        if !state.assign_roles(role_id) {
            tracing::warn!(
                "[Session] Role '{}' is not part of scene '{}'",
                role_id,
                state.scene.id
            );
            return false;
        }

        let script = opening_script(&state.scene.id, role_id);
        state.seed_turns(script);
        self.generation.fetch_add(1, Ordering::SeqCst);
        tracing::info!(
            "[Session] Role '{}' selected in '{}' (AI plays {:?}, {} opening turns)",
            role_id,
            state.scene.id,
            state.ai_role,
            state.turns.len()
        );

        let event = SessionEvent::DialogueSeeded {
            selected_role: role_id.to_string(),
            ai_role: state.ai_role.clone(),
        };
        drop(state);
        self.publish(event);
        true
    }

    pub(crate) async fn submit_message(self: &Arc<Self>, text: &str) -> Option<DialogueTurn> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let (turn, scene_id, user_role, ai_role, generation) = {
            let mut state = self.state.write().await;
            let Some(user_role) = state.selected_role.clone() else {
                tracing::debug!("[Session] Ignoring message submitted before role selection");
                return None;
            };
            let turn = state.append_turn(Sender::User, text, None, user_role.clone());
            let generation = self.generation.load(Ordering::SeqCst);
            (turn, state.scene.id.clone(), user_role, state.ai_role.clone(), generation)
        };
        self.publish(SessionEvent::TurnAppended { turn: turn.clone() });

        let reply = self.replies.pick(&scene_id, &user_role);
        let session = Arc::downgrade(self);
        self.tasks.schedule(self.timing.ai_reply_delay(), async move {
            let Some(session) = session.upgrade() else {
                return;
            };
            let mut state = session.state.write().await;
            if session.generation.load(Ordering::SeqCst) != generation {
                tracing::debug!("[Session] Dropping reply to a dialogue that was reseeded");
                return;
            }
            let turn = state.append_turn(
                Sender::Ai,
                reply.text,
                Some(reply.translation.to_string()),
                ai_role.unwrap_or_default(),
            );
            drop(state);
            tracing::debug!("[Session] AI reply #{} appended", turn.id);
            session.publish(SessionEvent::TurnAppended { turn });
        });

        Some(turn)
    }

    pub(crate) async fn toggle_immersive_mode(&self) -> bool {
        let enabled = self.state.read().await.immersive_mode;

        if enabled {
            if self.display.is_fullscreen() {
                if let Err(e) = self.display.exit_fullscreen().await {
                    tracing::warn!("[Session] Failed to leave full screen: {}", e);
                    self.notify(NoticeLevel::Warning, format!("Full screen error: {e}"));
                }
            }
            self.set_immersive(false).await;
            return false;
        }

        match self.display.request_fullscreen().await {
            Ok(()) => {
                self.set_immersive(true).await;
                true
            }
            Err(e) => {
                tracing::warn!("[Session] Full screen request failed: {}", e);
                self.notify(NoticeLevel::Warning, format!("Full screen error: {e}"));
                false
            }
        }
    }

    async fn set_immersive(&self, enabled: bool) {
        let mut state = self.state.write().await;
        if state.immersive_mode == enabled {
            return;
        }
        state.immersive_mode = enabled;
        drop(state);
        self.publish(SessionEvent::ImmersiveChanged { enabled });
    }

    pub(crate) async fn set_bilingual_mode(&self, enabled: bool) {
        self.state.write().await.bilingual_mode = enabled;
    }

    pub(crate) async fn set_show_word_panel(&self, visible: bool) {
        self.state.write().await.show_word_panel = visible;
    }
}

/// Owns a single learning session.
///
/// Dropping the controller cancels every deferred update and detaches every
/// [`SessionContext`] handed out by [`context`](Self::context).
pub struct SceneSessionController {
    inner: Arc<SessionInner>,
}

impl SceneSessionController {
    /// Loads a scene from the built-in catalog.
    pub async fn load_scene(scene_id: &str, options: SessionOptions) -> Result<Self> {
        Self::load_scene_from(SceneCatalog::builtin(), scene_id, options).await
    }

    /// Loads a scene from `catalog`, waiting out the configured load delay.
    ///
    /// # Errors
    ///
    /// Returns `LingoError::NotFound` if the catalog has no such scene.
    pub async fn load_scene_from(
        catalog: &SceneCatalog,
        scene_id: &str,
        options: SessionOptions,
    ) -> Result<Self> {
        let scene = catalog
            .find(scene_id)
            .cloned()
            .ok_or_else(|| LingoError::not_found("Scene", scene_id))?;
        let words = catalog.words_for(scene_id);

        tokio::time::sleep(options.timing.scene_load_delay()).await;

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let inner = Arc::new(SessionInner {
            state: RwLock::new(SessionState::new(scene, words, &options.defaults)),
            events,
            replies: options.replies,
            display: options.display,
            tasks: DeferredTasks::new(),
            timing: options.timing,
            generation: AtomicU64::new(0),
        });
        spawn_fullscreen_watcher(&inner);

        tracing::info!("[Session] Scene '{}' loaded", scene_id);
        Ok(Self { inner })
    }

    /// Returns a handle views can use to read and mutate this session.
    pub fn context(&self) -> SessionContext {
        SessionContext::new(Arc::downgrade(&self.inner))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.subscribe()
    }

    pub async fn snapshot(&self) -> SessionState {
        self.inner.snapshot().await
    }

    /// Picks the learner's role and seeds the opening dialogue.
    ///
    /// Returns `false` without touching the session if the role is not part
    /// of the scene.
    pub async fn select_role(&self, role_id: &str) -> bool {
        self.inner.select_role(role_id).await
    }

    /// Appends a learner turn and schedules the partner's reply.
    ///
    /// Returns `None` (and changes nothing) for blank text or when no role
    /// has been selected yet.
    pub async fn submit_message(&self, text: &str) -> Option<DialogueTurn> {
        self.inner.submit_message(text).await
    }

    /// Enters or leaves immersive mode and returns the new flag.
    pub async fn toggle_immersive_mode(&self) -> bool {
        self.inner.toggle_immersive_mode().await
    }

    pub async fn set_bilingual_mode(&self, enabled: bool) {
        self.inner.set_bilingual_mode(enabled).await;
    }

    pub async fn set_show_word_panel(&self, visible: bool) {
        self.inner.set_show_word_panel(visible).await;
    }

    /// Number of deferred updates still pending.
    pub fn pending_tasks(&self) -> usize {
        self.inner.tasks.pending()
    }
}

impl Drop for SceneSessionController {
    fn drop(&mut self) {
        self.inner.tasks.cancel_all();
    }
}

/// Keeps `immersive_mode` in sync with the host: any exit from full screen,
/// whoever triggered it, clears the flag.
fn spawn_fullscreen_watcher(inner: &Arc<SessionInner>) {
    let mut changes = inner.display.subscribe();
    let display = inner.display.clone();
    let session: Weak<SessionInner> = Arc::downgrade(inner);

    inner.tasks.spawn_until_cancelled(async move {
        loop {
            let active = match changes.recv().await {
                Ok(change) => change.active,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("[Session] Missed {} full screen changes", skipped);
                    display.is_fullscreen()
                }
                Err(RecvError::Closed) => break,
            };
            if active {
                continue;
            }
            let Some(session) = session.upgrade() else {
                break;
            };
            session.set_immersive(false).await;
        }
    });
}
