//! Scene domain models.

use serde::{Deserialize, Serialize};

/// A role that can be played inside a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Role identifier, unique within its scene (e.g. "customer").
    pub id: String,
    /// Display name shown next to the role's turns.
    pub name: String,
    /// Short description of the role.
    pub description: String,
    /// Avatar glyph (emoji).
    pub avatar: String,
}

/// A learning scenario template.
///
/// Scenes are static: they are defined once in the catalog and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Difficulty label (e.g. "入门", "初级").
    pub level: String,
    /// Free-form summary of the vocabulary themes practiced in this scene.
    pub vocabulary: String,
    /// Roles available in this scene, in display order.
    pub characters: Vec<Character>,
}

impl Scene {
    /// Returns the character with the given id, if the scene defines it.
    pub fn character(&self, role_id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == role_id)
    }

    /// Returns true if `role_id` is one of this scene's roles.
    pub fn has_role(&self, role_id: &str) -> bool {
        self.character(role_id).is_some()
    }

    /// Returns the role the AI plays when the user picks `role_id`.
    ///
    /// This is the first character in list order whose id differs from
    /// `role_id`, or `None` when the scene has no other character.
    pub fn ai_role_for(&self, role_id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id != role_id)
    }
}

/// A vocabulary entry tied to a scene.
///
/// Mastery is tracked outside the word (as a set of ids), never on the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: u32,
    /// The headword itself (e.g. "menu", "boarding pass").
    pub word: String,
    /// IPA pronunciation.
    pub pronunciation: String,
    pub meaning: String,
    /// Example sentence using the word.
    pub example: String,
}
