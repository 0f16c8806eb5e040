//! Word Review Panel: flashcard study over a scene's vocabulary.
//!
//! Mastery lives in a separate id set; the words themselves are never
//! modified. Progress is the join of the two.

use crate::session::SessionContext;
use lingo_core::Result;
use lingo_core::scene::Word;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How the panel quizzes the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewMode {
    #[default]
    Flashcard,
    /// Multiple choice. Declared but not available yet.
    Quiz,
    /// Type the word from its meaning. Declared but not available yet.
    Spelling,
}

impl ReviewMode {
    pub const ALL: [ReviewMode; 3] = [ReviewMode::Flashcard, ReviewMode::Quiz, ReviewMode::Spelling];

    pub fn is_available(self) -> bool {
        matches!(self, ReviewMode::Flashcard)
    }

    pub fn label(self) -> &'static str {
        match self {
            ReviewMode::Flashcard => "闪卡",
            ReviewMode::Quiz => "测验",
            ReviewMode::Spelling => "拼写",
        }
    }
}

#[derive(Debug, Clone)]
pub struct WordReviewPanel {
    words: Vec<Word>,
    index: usize,
    revealed: bool,
    mastered: BTreeSet<u32>,
    mode: ReviewMode,
}

impl WordReviewPanel {
    pub fn new(words: Vec<Word>) -> Self {
        Self {
            words,
            index: 0,
            revealed: false,
            mastered: BTreeSet::new(),
            mode: ReviewMode::default(),
        }
    }

    /// Builds a panel over the session's vocabulary.
    ///
    /// # Errors
    ///
    /// Returns `LingoError::Config` if the context is not attached.
    pub async fn attach(context: &SessionContext) -> Result<Self> {
        Ok(Self::new(context.words().await?))
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Word> {
        self.words.get(self.index)
    }

    /// Moves to the next word, wrapping to the first. Hides the meaning.
    pub fn next(&mut self) {
        if self.words.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.words.len();
        self.revealed = false;
    }

    /// Moves to the previous word, wrapping to the last. Hides the meaning.
    pub fn previous(&mut self) {
        if self.words.is_empty() {
            return;
        }
        self.index = (self.index + self.words.len() - 1) % self.words.len();
        self.revealed = false;
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn toggle_reveal(&mut self) {
        self.revealed = !self.revealed;
    }

    /// Flips mastery for `word_id` and returns whether it is now mastered.
    pub fn toggle_mastered(&mut self, word_id: u32) -> bool {
        if self.mastered.remove(&word_id) {
            false
        } else {
            self.mastered.insert(word_id);
            true
        }
    }

    /// Flips mastery for the word on screen. `None` when the list is empty.
    pub fn toggle_current_mastered(&mut self) -> Option<bool> {
        let id = self.current()?.id;
        Some(self.toggle_mastered(id))
    }

    pub fn is_mastered(&self, word_id: u32) -> bool {
        self.mastered.contains(&word_id)
    }

    pub fn mastered_ids(&self) -> &BTreeSet<u32> {
        &self.mastered
    }

    /// Number of words in the list that are mastered.
    pub fn mastered_count(&self) -> usize {
        self.words
            .iter()
            .filter(|w| self.mastered.contains(&w.id))
            .count()
    }

    /// `round(mastered / total * 100)`, or 0 for an empty list.
    pub fn progress_percentage(&self) -> u32 {
        progress_percentage(self.mastered_count(), self.words.len())
    }

    pub fn mode(&self) -> ReviewMode {
        self.mode
    }

    /// Switches mode. Unavailable modes can be selected; the view shows them
    /// as coming soon.
    pub fn set_mode(&mut self, mode: ReviewMode) {
        self.mode = mode;
    }
}

/// Rounds half up, like the progress bar label.
pub fn progress_percentage(mastered: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * mastered + total) / (2 * total)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: u32) -> Vec<Word> {
        (1..=n)
            .map(|id| Word {
                id,
                word: format!("word{id}"),
                pronunciation: String::new(),
                meaning: format!("meaning{id}"),
                example: String::new(),
            })
            .collect()
    }

    #[test]
    fn test_navigation_wraps_both_ways() {
        let mut panel = WordReviewPanel::new(words(3));

        panel.previous();
        assert_eq!(panel.index(), 2);
        panel.next();
        assert_eq!(panel.index(), 0);
        panel.next();
        panel.next();
        assert_eq!(panel.index(), 2);
        panel.next();
        assert_eq!(panel.index(), 0);
    }

    #[test]
    fn test_navigation_hides_meaning() {
        let mut panel = WordReviewPanel::new(words(2));
        panel.toggle_reveal();
        assert!(panel.is_revealed());

        panel.next();
        assert!(!panel.is_revealed());
    }

    #[test]
    fn test_empty_panel_is_safe() {
        let mut panel = WordReviewPanel::new(Vec::new());
        panel.next();
        panel.previous();

        assert!(panel.current().is_none());
        assert_eq!(panel.toggle_current_mastered(), None);
        assert_eq!(panel.progress_percentage(), 0);
    }

    #[test]
    fn test_toggle_mastered_is_self_inverse() {
        let mut panel = WordReviewPanel::new(words(3));
        panel.toggle_mastered(2);
        let before = panel.mastered_ids().clone();

        assert!(panel.toggle_mastered(3));
        assert!(!panel.toggle_mastered(3));
        assert_eq!(panel.mastered_ids(), &before);
    }

    #[test]
    fn test_progress_rounds() {
        assert_eq!(progress_percentage(0, 3), 0);
        assert_eq!(progress_percentage(1, 3), 33);
        assert_eq!(progress_percentage(2, 3), 67);
        assert_eq!(progress_percentage(1, 8), 13);
        assert_eq!(progress_percentage(3, 3), 100);
        assert_eq!(progress_percentage(0, 0), 0);
    }

    #[test]
    fn test_progress_ignores_ids_outside_list() {
        let mut panel = WordReviewPanel::new(words(4));
        panel.toggle_mastered(1);
        panel.toggle_mastered(99);

        assert_eq!(panel.mastered_count(), 1);
        assert_eq!(panel.progress_percentage(), 25);
    }

    #[test]
    fn test_placeholder_modes_are_selectable_but_unavailable() {
        let mut panel = WordReviewPanel::new(words(1));
        panel.set_mode(ReviewMode::Spelling);

        assert_eq!(panel.mode(), ReviewMode::Spelling);
        assert!(!panel.mode().is_available());
        assert!(ReviewMode::Flashcard.is_available());
    }
}
