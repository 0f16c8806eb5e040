//! Translation desk: source/target languages, a provider, history and
//! favorites.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lingo_core::{LingoError, Result};
use lingo_interaction::CommandSender;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

/// Maximum number of history entries kept.
pub const HISTORY_LIMIT: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub id: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
}

pub const LANGUAGES: &[Language] = &[
    Language { id: "en", name: "英语", flag: "🇺🇸" },
    Language { id: "zh", name: "中文", flag: "🇨🇳" },
    Language { id: "ja", name: "日语", flag: "🇯🇵" },
    Language { id: "ko", name: "韩语", flag: "🇰🇷" },
    Language { id: "fr", name: "法语", flag: "🇫🇷" },
    Language { id: "de", name: "德语", flag: "🇩🇪" },
    Language { id: "es", name: "西班牙语", flag: "🇪🇸" },
    Language { id: "it", name: "意大利语", flag: "🇮🇹" },
];

pub fn language(id: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.id == id)
}

#[async_trait]
pub trait TranslationProvider: Send + Sync {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

// ============================================================================
// Providers
// ============================================================================

const PHRASEBOOK: &[(&str, &str)] = &[
    ("Hello, how are you?", "你好，你好吗？"),
    ("I am learning English.", "我正在学习英语。"),
    ("What is your name?", "你叫什么名字？"),
    ("Nice to meet you.", "很高兴认识你。"),
    ("Thank you very much.", "非常感谢。"),
    ("Good morning!", "早上好！"),
    ("Good night!", "晚安！"),
    ("How much is this?", "这个多少钱？"),
    ("Where is the restroom?", "洗手间在哪里？"),
    ("Can you help me?", "你能帮助我吗？"),
];

const OFFLINE_FALLBACK_PREFIX: &str = "（离线翻译不可用，原文如下）";

/// Phrasebook lookup with a simulated delay. Unknown text is echoed back
/// behind a notice.
#[derive(Debug, Clone)]
pub struct OfflineTranslator {
    delay: Duration,
}

impl OfflineTranslator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl TranslationProvider for OfflineTranslator {
    async fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String> {
        tokio::time::sleep(self.delay).await;
        let translated = PHRASEBOOK
            .iter()
            .find(|(phrase, _)| *phrase == text)
            .map(|(_, translation)| translation.to_string())
            .unwrap_or_else(|| format!("{OFFLINE_FALLBACK_PREFIX} {text}"));
        Ok(translated)
    }
}

/// Translation through the backend's `translate` command.
pub struct BackendTranslator {
    sender: Arc<dyn CommandSender>,
}

impl BackendTranslator {
    pub const COMMAND: &'static str = "translate";

    pub fn new(sender: Arc<dyn CommandSender>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl TranslationProvider for BackendTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let payload = json!({
            "text": text,
            "source_lang": source,
            "target_lang": target,
        });
        let response = self.sender.send_command(Self::COMMAND, Some(payload)).await?;

        match response.data {
            Value::String(text) => Ok(text),
            data => data
                .get("result")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| LingoError::backend("Translate response has no result")),
        }
    }
}

// ============================================================================
// Desk
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    pub id: u64,
    pub source_text: String,
    pub target_text: String,
    pub source_lang: String,
    pub target_lang: String,
    pub timestamp: DateTime<Utc>,
}

pub struct TranslationDesk {
    provider: Arc<dyn TranslationProvider>,
    source_text: String,
    translated_text: String,
    source_lang: &'static str,
    target_lang: &'static str,
    history: VecDeque<TranslationRecord>,
    favorites: BTreeSet<u64>,
    next_id: u64,
}

impl TranslationDesk {
    /// Creates a desk translating English to Chinese.
    pub fn new(provider: Arc<dyn TranslationProvider>) -> Self {
        Self {
            provider,
            source_text: String::new(),
            translated_text: String::new(),
            source_lang: "en",
            target_lang: "zh",
            history: VecDeque::new(),
            favorites: BTreeSet::new(),
            next_id: 1,
        }
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn translated_text(&self) -> &str {
        &self.translated_text
    }

    pub fn source_lang(&self) -> &'static str {
        self.source_lang
    }

    pub fn target_lang(&self) -> &'static str {
        self.target_lang
    }

    pub fn set_source_text(&mut self, text: impl Into<String>) {
        self.source_text = text.into();
    }

    pub fn set_source_lang(&mut self, id: &str) -> Result<()> {
        self.source_lang = lookup_language(id)?;
        Ok(())
    }

    pub fn set_target_lang(&mut self, id: &str) -> Result<()> {
        self.target_lang = lookup_language(id)?;
        Ok(())
    }

    /// Swaps the languages along with the source and translated texts.
    pub fn swap_languages(&mut self) {
        std::mem::swap(&mut self.source_lang, &mut self.target_lang);
        std::mem::swap(&mut self.source_text, &mut self.translated_text);
    }

    pub fn clear(&mut self) {
        self.source_text.clear();
        self.translated_text.clear();
    }

    /// Translates the source text and records it in the history.
    ///
    /// Returns `Ok(None)` without calling the provider when the source text
    /// is blank.
    pub async fn translate(&mut self) -> Result<Option<&TranslationRecord>> {
        if self.source_text.trim().is_empty() {
            tracing::warn!("[Translation] Nothing to translate");
            return Ok(None);
        }

        let translated = self
            .provider
            .translate(&self.source_text, self.source_lang, self.target_lang)
            .await?;
        self.translated_text = translated.clone();

        let record = TranslationRecord {
            id: self.next_id,
            source_text: self.source_text.clone(),
            target_text: translated,
            source_lang: self.source_lang.to_string(),
            target_lang: self.target_lang.to_string(),
            timestamp: Utc::now(),
        };
        self.next_id += 1;

        self.history.push_front(record);
        while self.history.len() > HISTORY_LIMIT {
            if let Some(evicted) = self.history.pop_back() {
                self.favorites.remove(&evicted.id);
            }
        }
        Ok(self.history.front())
    }

    /// History, newest first.
    pub fn history(&self) -> impl Iterator<Item = &TranslationRecord> {
        self.history.iter()
    }

    /// Flips the favorite flag of a history entry and returns the new state.
    ///
    /// # Errors
    ///
    /// Returns `LingoError::NotFound` if no history entry has this id.
    pub fn toggle_favorite(&mut self, id: u64) -> Result<bool> {
        self.find_record(id)?;
        if self.favorites.remove(&id) {
            Ok(false)
        } else {
            self.favorites.insert(id);
            Ok(true)
        }
    }

    /// Forgets every history entry and favorite.
    pub fn clear_history(&mut self) {
        tracing::info!(
            "[Translation] Clearing {} history entries",
            self.history.len()
        );
        self.history.clear();
        self.favorites.clear();
    }

    pub fn is_favorite(&self, id: u64) -> bool {
        self.favorites.contains(&id)
    }

    /// Restores a history entry into the desk.
    pub fn load_from_history(&mut self, id: u64) -> Result<()> {
        let record = self.find_record(id)?.clone();
        let source_lang = lookup_language(&record.source_lang)?;
        let target_lang = lookup_language(&record.target_lang)?;
        self.source_text = record.source_text;
        self.translated_text = record.target_text;
        self.source_lang = source_lang;
        self.target_lang = target_lang;
        Ok(())
    }

    fn find_record(&self, id: u64) -> Result<&TranslationRecord> {
        self.history
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| LingoError::not_found("TranslationRecord", id.to_string()))
    }
}

fn lookup_language(id: &str) -> Result<&'static str> {
    language(id)
        .map(|l| l.id)
        .ok_or_else(|| LingoError::not_found("Language", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desk() -> TranslationDesk {
        TranslationDesk::new(Arc::new(OfflineTranslator::new(Duration::ZERO)))
    }

    #[tokio::test]
    async fn test_phrasebook_hit() {
        let mut desk = desk();
        desk.set_source_text("Good morning!");

        let record = desk.translate().await.unwrap().unwrap();
        assert_eq!(record.target_text, "早上好！");
        assert_eq!(desk.translated_text(), "早上好！");
    }

    #[tokio::test]
    async fn test_unknown_text_falls_back() {
        let mut desk = desk();
        desk.set_source_text("The weather is lovely");

        desk.translate().await.unwrap();
        assert!(desk.translated_text().ends_with("The weather is lovely"));
    }

    #[tokio::test]
    async fn test_blank_input_is_a_no_op() {
        let mut desk = desk();
        desk.set_source_text("   ");

        assert!(desk.translate().await.unwrap().is_none());
        assert_eq!(desk.history().count(), 0);
    }

    #[tokio::test]
    async fn test_history_is_newest_first_and_capped() {
        let mut desk = desk();
        for i in 0..(HISTORY_LIMIT + 5) {
            desk.set_source_text(format!("sentence {i}"));
            desk.translate().await.unwrap();
        }

        let history: Vec<_> = desk.history().collect();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0].source_text, format!("sentence {}", HISTORY_LIMIT + 4));
    }

    #[tokio::test]
    async fn test_swap_exchanges_languages_and_texts() {
        let mut desk = desk();
        desk.set_source_text("Good night!");
        desk.translate().await.unwrap();

        desk.swap_languages();
        assert_eq!(desk.source_lang(), "zh");
        assert_eq!(desk.target_lang(), "en");
        assert_eq!(desk.source_text(), "晚安！");
        assert_eq!(desk.translated_text(), "Good night!");
    }

    #[tokio::test]
    async fn test_load_from_history_and_favorites() {
        let mut desk = desk();
        desk.set_target_lang("ja").unwrap();
        desk.set_source_text("Can you help me?");
        let id = desk.translate().await.unwrap().unwrap().id;

        desk.clear();
        desk.set_target_lang("fr").unwrap();
        desk.load_from_history(id).unwrap();
        assert_eq!(desk.source_text(), "Can you help me?");
        assert_eq!(desk.target_lang(), "ja");

        assert!(desk.toggle_favorite(id).unwrap());
        assert!(desk.is_favorite(id));
        assert!(!desk.toggle_favorite(id).unwrap());
        assert!(desk.load_from_history(999).unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_favorite_requires_history_entry() {
        let mut desk = desk();
        assert!(desk.toggle_favorite(1).unwrap_err().is_not_found());
        assert!(!desk.is_favorite(1));
    }

    #[tokio::test]
    async fn test_evicted_entries_lose_favorite() {
        let mut desk = desk();
        desk.set_source_text("first");
        let first = desk.translate().await.unwrap().unwrap().id;
        desk.toggle_favorite(first).unwrap();

        for i in 0..HISTORY_LIMIT {
            desk.set_source_text(format!("sentence {i}"));
            desk.translate().await.unwrap();
        }

        assert!(desk.history().all(|r| r.id != first));
        assert!(!desk.is_favorite(first));
        assert!(desk.toggle_favorite(first).unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_clear_history_drops_entries_and_favorites() {
        let mut desk = desk();
        desk.set_source_text("Good morning!");
        let id = desk.translate().await.unwrap().unwrap().id;
        desk.toggle_favorite(id).unwrap();

        desk.clear_history();

        assert_eq!(desk.history().count(), 0);
        assert!(!desk.is_favorite(id));
        assert_eq!(desk.source_text(), "Good morning!");

        desk.set_source_text("Good night!");
        let next = desk.translate().await.unwrap().unwrap().id;
        assert!(next > id);
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        let mut desk = desk();
        assert!(desk.set_source_lang("xx").is_err());
        assert_eq!(desk.source_lang(), "en");
    }
}
