//! Dialogue turn types.

use serde::{Deserialize, Serialize};

/// Who produced a dialogue turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The learner.
    User,
    /// The simulated conversation partner.
    Ai,
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueTurn {
    /// Sequential id, strictly increasing within a session.
    pub id: u64,
    pub sender: Sender,
    pub text: String,
    /// Translation shown in bilingual mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    /// Id of the scene character speaking this turn. Empty when the scene
    /// offers no role for the AI.
    pub role: String,
}

impl DialogueTurn {
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    pub fn is_ai(&self) -> bool {
        self.sender == Sender::Ai
    }
}
