use serde::{Deserialize, Serialize};

use super::DialogueTurn;

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Events published by a running session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A turn was appended to the dialogue.
    TurnAppended { turn: DialogueTurn },
    /// The opening script was seeded after a role was picked.
    DialogueSeeded {
        selected_role: String,
        #[serde(default)]
        ai_role: Option<String>,
    },
    /// Immersive (full-screen) mode was switched on or off.
    ImmersiveChanged { enabled: bool },
    /// Something the front end should show as a toast.
    Notice { level: NoticeLevel, message: String },
}

impl SessionEvent {
    pub fn notice(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self::Notice {
            level,
            message: message.into(),
        }
    }
}
