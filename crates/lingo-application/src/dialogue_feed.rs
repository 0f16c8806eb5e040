//! Dialogue Feed: the conversation view and its input box.

use crate::session::SessionContext;
use lingo_core::Result;
use lingo_core::scene::quick_phrases;
use lingo_core::session::{DialogueTurn, Sender, SessionState};
use std::fmt;

/// Misspellings the input box watches for, with their corrections.
const COMMON_MISSPELLINGS: &[(&str, &str)] = &[
    ("teh", "the"),
    ("wrok", "work"),
    ("beleive", "believe"),
    ("recieve", "receive"),
    ("adress", "address"),
];

/// A spelling suggestion for the current input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypoHint {
    pub misspelling: &'static str,
    pub suggestion: &'static str,
}

impl fmt::Display for TypoHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "您可能拼写错误：\"{}\"，正确拼写可能是：{}",
            self.misspelling, self.suggestion
        )
    }
}

/// Scans `input` (case-insensitively) for a known misspelling. First hit wins.
pub fn detect_typo(input: &str) -> Option<TypoHint> {
    let lower = input.to_lowercase();
    COMMON_MISSPELLINGS
        .iter()
        .find(|(misspelling, _)| lower.contains(misspelling))
        .map(|&(misspelling, suggestion)| TypoHint {
            misspelling,
            suggestion,
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Char(char),
}

/// A key press in the input box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }
}

/// A turn ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTurn {
    pub id: u64,
    pub sender: Sender,
    pub speaker: String,
    pub avatar: String,
    pub text: String,
    /// Present only in bilingual mode.
    pub translation: Option<String>,
}

pub struct DialogueFeed {
    context: SessionContext,
    input: String,
    typo: Option<TypoHint>,
    show_quick_phrases: bool,
}

impl DialogueFeed {
    /// Attaches the feed to a session.
    ///
    /// # Errors
    ///
    /// Returns `LingoError::Config` if the context is not attached.
    pub fn attach(context: SessionContext) -> Result<Self> {
        context.ensure_attached()?;
        Ok(Self {
            context,
            input: String::new(),
            typo: None,
            show_quick_phrases: false,
        })
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the input text and re-runs the typo check.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.refresh_typo();
    }

    pub fn typo_hint(&self) -> Option<&TypoHint> {
        self.typo.as_ref()
    }

    fn refresh_typo(&mut self) {
        self.typo = detect_typo(&self.input);
    }

    /// Handles a key press. Enter without Shift submits; Shift+Enter inserts a
    /// newline.
    pub async fn handle_key(&mut self, press: KeyPress) -> Result<Option<DialogueTurn>> {
        match press.key {
            Key::Enter if !press.shift => return self.submit().await,
            Key::Enter => self.input.push('\n'),
            Key::Backspace => {
                self.input.pop();
            }
            Key::Char(c) => self.input.push(c),
        }
        self.refresh_typo();
        Ok(None)
    }

    /// Sends the current input to the session.
    ///
    /// On success the input, typo hint and quick phrase picker are cleared.
    /// Blank input, or a session still waiting for a role, leaves everything
    /// as it was.
    pub async fn submit(&mut self) -> Result<Option<DialogueTurn>> {
        let text = self.input.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let turn = self.context.submit_message(text).await?;
        if turn.is_some() {
            self.input.clear();
            self.typo = None;
            self.show_quick_phrases = false;
        }
        Ok(turn)
    }

    pub fn quick_phrases_open(&self) -> bool {
        self.show_quick_phrases
    }

    pub fn toggle_quick_phrases(&mut self) {
        self.show_quick_phrases = !self.show_quick_phrases;
    }

    /// Phrases offered for the scene and the learner's role.
    pub async fn quick_phrases(&self) -> Result<&'static [&'static str]> {
        let state = self.context.snapshot().await?;
        Ok(quick_phrases(&state.scene.id, state.selected_role.as_deref()))
    }

    /// Copies a phrase into the input box and closes the picker. Nothing is
    /// sent until [`submit`](Self::submit).
    pub fn pick_quick_phrase(&mut self, phrase: &str) {
        self.set_input(phrase);
        self.show_quick_phrases = false;
    }

    pub async fn set_bilingual_mode(&self, enabled: bool) -> Result<()> {
        self.context.set_bilingual_mode(enabled).await
    }

    pub async fn render(&self) -> Result<Vec<RenderedTurn>> {
        let state = self.context.snapshot().await?;
        Ok(render_turns(&state))
    }
}

/// Renders every turn with its speaker. Translations are dropped unless
/// bilingual mode is on.
pub fn render_turns(state: &SessionState) -> Vec<RenderedTurn> {
    state
        .turns
        .iter()
        .map(|turn| {
            let character = state.scene.character(&turn.role);
            let (speaker, avatar) = match (character, turn.sender) {
                (Some(c), _) => (c.name.clone(), c.avatar.clone()),
                (None, Sender::User) => ("You".to_string(), "🙂".to_string()),
                (None, Sender::Ai) => ("AI".to_string(), "🤖".to_string()),
            };
            RenderedTurn {
                id: turn.id,
                sender: turn.sender,
                speaker,
                avatar,
                text: turn.text.clone(),
                translation: if state.bilingual_mode {
                    turn.translation.clone()
                } else {
                    None
                },
            }
        })
        .collect()
}
