use super::message::{DialogueTurn, Sender};
use crate::config::SessionDefaults;
use crate::scene::{Character, Scene, ScriptLine, Word};
use serde::{Deserialize, Serialize};

/// Where the learner is in the session flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Scene is loaded, waiting for the learner to pick a role.
    RoleSelection,
    /// A role is selected and turns can be submitted.
    Conversing,
}

/// The live state of one learning session.
///
/// Created when a scene is entered and discarded when the session is torn
/// down. Nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub scene: Scene,
    /// Vocabulary practiced in this scene.
    pub words: Vec<Word>,
    /// Conversation so far, in append order.
    pub turns: Vec<DialogueTurn>,
    pub selected_role: Option<String>,
    pub ai_role: Option<String>,
    pub immersive_mode: bool,
    pub bilingual_mode: bool,
    pub show_word_panel: bool,
    pub phase: SessionPhase,
}

impl SessionState {
    pub fn new(scene: Scene, words: Vec<Word>, defaults: &SessionDefaults) -> Self {
        Self {
            scene,
            words,
            turns: Vec::new(),
            selected_role: None,
            ai_role: None,
            immersive_mode: false,
            bilingual_mode: defaults.bilingual_mode,
            show_word_panel: defaults.show_word_panel,
            phase: SessionPhase::RoleSelection,
        }
    }

    /// Id the next appended turn will receive.
    pub fn next_turn_id(&self) -> u64 {
        self.turns.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Appends a turn with the next sequential id and returns a copy of it.
    pub fn append_turn(
        &mut self,
        sender: Sender,
        text: impl Into<String>,
        translation: Option<String>,
        role: impl Into<String>,
    ) -> DialogueTurn {
        let turn = DialogueTurn {
            id: self.next_turn_id(),
            sender,
            text: text.into(),
            translation,
            role: role.into(),
        };
        self.turns.push(turn.clone());
        turn
    }

    /// Assigns the learner's role and derives the AI role.
    ///
    /// Returns `false` and leaves the state untouched when `role_id` is not
    /// one of the scene's characters.
    pub fn assign_roles(&mut self, role_id: &str) -> bool {
        if !self.scene.has_role(role_id) {
            return false;
        }
        self.ai_role = self.scene.ai_role_for(role_id).map(|c| c.id.clone());
        self.selected_role = Some(role_id.to_string());
        self.phase = SessionPhase::Conversing;
        true
    }

    /// Replaces the turn sequence with an opening script, numbered from 1.
    pub fn seed_turns(&mut self, script: &[ScriptLine]) {
        self.turns = script
            .iter()
            .zip(1u64..)
            .map(|(line, id)| line.to_turn(id))
            .collect();
    }

    pub fn selected_character(&self) -> Option<&Character> {
        self.selected_role
            .as_deref()
            .and_then(|id| self.scene.character(id))
    }

    pub fn ai_character(&self) -> Option<&Character> {
        self.ai_role.as_deref().and_then(|id| self.scene.character(id))
    }
}
