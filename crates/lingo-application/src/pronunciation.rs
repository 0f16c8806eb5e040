//! Pronunciation practice.
//!
//! The microphone is an exclusive resource. A practice run acquires it on
//! [`PronunciationPractice::start`] and holds it as a [`MicrophoneLease`],
//! which is released when the run finishes, when the learner exits, and
//! when the practice is dropped.

use async_trait::async_trait;
use lingo_core::config::TimingConfig;
use lingo_core::{LingoError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Lowest and highest score the scorer hands out.
const SCORE_RANGE: std::ops::RangeInclusive<u32> = 75..=94;
/// A score at or above this counts as a correct pronunciation.
const CORRECT_THRESHOLD: u32 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "简单",
            Difficulty::Medium => "中等",
            Difficulty::Hard => "困难",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PracticeWord {
    pub id: u32,
    pub word: &'static str,
    pub difficulty: Difficulty,
}

const fn practice_word(id: u32, word: &'static str, difficulty: Difficulty) -> PracticeWord {
    PracticeWord {
        id,
        word,
        difficulty,
    }
}

pub const PRACTICE_WORDS: &[PracticeWord] = &[
    practice_word(1, "pronunciation", Difficulty::Medium),
    practice_word(2, "difficulty", Difficulty::Medium),
    practice_word(3, "conversation", Difficulty::Medium),
    practice_word(4, "entrepreneur", Difficulty::Hard),
    practice_word(5, "accommodation", Difficulty::Hard),
    practice_word(6, "restaurant", Difficulty::Easy),
    practice_word(7, "appreciate", Difficulty::Medium),
    practice_word(8, "schedule", Difficulty::Medium),
    practice_word(9, "quarantine", Difficulty::Hard),
    practice_word(10, "beautiful", Difficulty::Easy),
];

/// Practice words, optionally restricted to one difficulty.
pub fn practice_words(filter: Option<Difficulty>) -> Vec<PracticeWord> {
    PRACTICE_WORDS
        .iter()
        .filter(|w| filter.is_none_or(|d| w.difficulty == d))
        .copied()
        .collect()
}

// ============================================================================
// Audio input
// ============================================================================

/// An open capture stream. Stopping it releases the device.
pub trait AudioStream: Send {
    fn stop(&mut self);
}

/// Source of microphone streams.
#[async_trait]
pub trait AudioInput: Send + Sync {
    /// Opens the microphone.
    ///
    /// # Errors
    ///
    /// Returns `LingoError::Resource` if access is denied or the device is busy.
    async fn open(&self) -> Result<Box<dyn AudioStream>>;
}

/// Exclusive hold on an open microphone stream.
pub struct MicrophoneLease {
    stream: Option<Box<dyn AudioStream>>,
}

impl MicrophoneLease {
    pub fn new(stream: Box<dyn AudioStream>) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    pub fn is_held(&self) -> bool {
        self.stream.is_some()
    }

    /// Stops the stream. Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            tracing::debug!("[Pronunciation] Microphone released");
        }
    }
}

impl Drop for MicrophoneLease {
    fn drop(&mut self) {
        self.release();
    }
}

/// Microphone stand-in that tracks how many streams are open.
#[derive(Debug, Default)]
pub struct SimulatedMicrophone {
    open_streams: Arc<AtomicUsize>,
    deny: AtomicBool,
}

impl SimulatedMicrophone {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `open` calls fail as if permission was refused.
    pub fn set_permission_denied(&self, denied: bool) {
        self.deny.store(denied, Ordering::SeqCst);
    }

    pub fn open_streams(&self) -> usize {
        self.open_streams.load(Ordering::SeqCst)
    }
}

struct SimulatedStream {
    open_streams: Arc<AtomicUsize>,
    live: bool,
}

impl AudioStream for SimulatedStream {
    fn stop(&mut self) {
        if self.live {
            self.live = false;
            self.open_streams.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for SimulatedStream {
    fn drop(&mut self) {
        self.stop();
    }
}

#[async_trait]
impl AudioInput for SimulatedMicrophone {
    async fn open(&self) -> Result<Box<dyn AudioStream>> {
        if self.deny.load(Ordering::SeqCst) {
            return Err(LingoError::resource("Microphone permission denied"));
        }
        self.open_streams.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(SimulatedStream {
            open_streams: self.open_streams.clone(),
            live: true,
        }))
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Running totals for one practice run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeStats {
    pub total_words: u32,
    pub correct_pronunciations: u32,
    /// Rounded running average.
    pub average_score: u32,
    pub highest_score: u32,
}

impl PracticeStats {
    pub fn record(&mut self, score: u32) {
        let total = self.average_score * self.total_words + score;
        self.total_words += 1;
        self.average_score = round_div(total, self.total_words);
        if score >= CORRECT_THRESHOLD {
            self.correct_pronunciations += 1;
        }
        self.highest_score = self.highest_score.max(score);
    }
}

/// One day of practice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeDay {
    /// `month-day` label, e.g. `11-20`.
    pub date: String,
    pub score: u32,
    pub words: u32,
}

/// Per-day practice history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeHistory {
    days: Vec<PracticeDay>,
}

impl PracticeHistory {
    pub fn new(days: Vec<PracticeDay>) -> Self {
        Self { days }
    }

    pub fn days(&self) -> &[PracticeDay] {
        &self.days
    }

    /// Folds a finished run into the entry for `date`, weighting the existing
    /// score and the run's average by their word counts.
    pub fn merge(&mut self, date: &str, stats: &PracticeStats) {
        if stats.total_words == 0 {
            return;
        }

        match self.days.iter_mut().find(|d| d.date == date) {
            Some(day) => {
                let words = day.words + stats.total_words;
                let weighted = day.score * day.words + stats.average_score * stats.total_words;
                day.score = round_div(weighted, words);
                day.words = words;
            }
            None => self.days.push(PracticeDay {
                date: date.to_string(),
                score: stats.average_score,
                words: stats.total_words,
            }),
        }
    }

    pub fn average_score(&self) -> u32 {
        if self.days.is_empty() {
            return 0;
        }
        let total: u32 = self.days.iter().map(|d| d.score).sum();
        round_div(total, self.days.len() as u32)
    }

    pub fn highest_score(&self) -> u32 {
        self.days.iter().map(|d| d.score).max().unwrap_or(0)
    }

    pub fn total_words(&self) -> u32 {
        self.days.iter().map(|d| d.words).sum()
    }
}

fn round_div(numerator: u32, denominator: u32) -> u32 {
    (2 * numerator + denominator) / (2 * denominator)
}

fn today_label() -> String {
    chrono::Local::now().format("%-m-%-d").to_string()
}

// ============================================================================
// Practice
// ============================================================================

/// Result of one recorded attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Scored; the practice moved on to the word at `next_index`.
    Advanced { score: u32, next_index: usize },
    /// Scored the last word; the run is over and merged into the history.
    Finished { score: u32, stats: PracticeStats },
}

pub struct PronunciationPractice {
    audio: Arc<dyn AudioInput>,
    timing: TimingConfig,
    rng: StdRng,
    words: Vec<PracticeWord>,
    index: usize,
    current_score: Option<u32>,
    stats: PracticeStats,
    lease: Option<MicrophoneLease>,
    history: PracticeHistory,
}

impl PronunciationPractice {
    pub fn new(audio: Arc<dyn AudioInput>, timing: TimingConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            audio,
            timing,
            rng,
            words: Vec::new(),
            index: 0,
            current_score: None,
            stats: PracticeStats::default(),
            lease: None,
            history: PracticeHistory::default(),
        }
    }

    pub fn with_history(mut self, history: PracticeHistory) -> Self {
        self.history = history;
        self
    }

    /// Starts a run over the words matching `filter` and opens the microphone.
    ///
    /// # Errors
    ///
    /// Returns `LingoError::Resource` if the microphone cannot be opened; the
    /// practice stays inactive and holds nothing.
    pub async fn start(&mut self, filter: Option<Difficulty>) -> Result<()> {
        self.release_microphone();
        self.words = practice_words(filter);
        self.index = 0;
        self.current_score = None;
        self.stats = PracticeStats::default();

        if self.words.is_empty() {
            return Err(LingoError::not_found("PracticeWord", format!("{filter:?}")));
        }

        match self.audio.open().await {
            Ok(stream) => {
                self.lease = Some(MicrophoneLease::new(stream));
                tracing::info!("[Pronunciation] Practice started with {} words", self.words.len());
                Ok(())
            }
            Err(e) => {
                tracing::warn!("[Pronunciation] Cannot access microphone: {}", e);
                Err(e)
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.lease.as_ref().is_some_and(MicrophoneLease::is_held)
    }

    pub fn current_word(&self) -> Option<&PracticeWord> {
        if !self.is_active() {
            return None;
        }
        self.words.get(self.index)
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn words(&self) -> &[PracticeWord] {
        &self.words
    }

    pub fn current_score(&self) -> Option<u32> {
        self.current_score
    }

    pub fn stats(&self) -> &PracticeStats {
        &self.stats
    }

    pub fn history(&self) -> &PracticeHistory {
        &self.history
    }

    /// Records the current word, scores it, and advances.
    ///
    /// Dropping the returned future part-way cancels the attempt; the
    /// microphone stays held until [`exit`](Self::exit) or drop.
    pub async fn record_attempt(&mut self) -> Result<AttemptOutcome> {
        if !self.is_active() {
            return Err(LingoError::resource("Microphone is not open"));
        }

        tokio::time::sleep(self.timing.recording()).await;
        tokio::time::sleep(self.timing.scoring_delay()).await;

        let score = self.rng.gen_range(SCORE_RANGE);
        self.current_score = Some(score);
        self.stats.record(score);
        tracing::debug!("[Pronunciation] Scored {} for word #{}", score, self.index);

        tokio::time::sleep(self.timing.advance_delay()).await;

        let next_index = self.index + 1;
        if next_index < self.words.len() {
            self.index = next_index;
            self.current_score = None;
            return Ok(AttemptOutcome::Advanced { score, next_index });
        }

        let stats = self.finish(&today_label());
        Ok(AttemptOutcome::Finished { score, stats })
    }

    fn finish(&mut self, date: &str) -> PracticeStats {
        self.release_microphone();
        self.history.merge(date, &self.stats);
        tracing::info!(
            "[Pronunciation] Practice finished, average score {}",
            self.stats.average_score
        );
        self.stats
    }

    /// Leaves the practice early. Nothing is merged into the history.
    pub fn exit(&mut self) {
        self.release_microphone();
    }

    fn release_microphone(&mut self) {
        if let Some(mut lease) = self.lease.take() {
            lease.release();
        }
    }
}

impl Drop for PronunciationPractice {
    fn drop(&mut self) {
        self.release_microphone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_filter() {
        assert_eq!(practice_words(None).len(), 10);
        let easy: Vec<_> = practice_words(Some(Difficulty::Easy))
            .into_iter()
            .map(|w| w.word)
            .collect();
        assert_eq!(easy, vec!["restaurant", "beautiful"]);
        assert_eq!(practice_words(Some(Difficulty::Hard)).len(), 3);
    }

    #[test]
    fn test_stats_running_average() {
        let mut stats = PracticeStats::default();
        stats.record(75);
        stats.record(90);
        stats.record(80);

        assert_eq!(stats.total_words, 3);
        assert_eq!(stats.correct_pronunciations, 2);
        // (75 + 90) / 2 = 82.5 -> 83, then (83 * 2 + 80) / 3 = 82
        assert_eq!(stats.average_score, 82);
        assert_eq!(stats.highest_score, 90);
    }

    #[test]
    fn test_history_merges_same_day() {
        let mut history = PracticeHistory::new(vec![PracticeDay {
            date: "11-20".to_string(),
            score: 88,
            words: 11,
        }]);
        let stats = PracticeStats {
            total_words: 2,
            correct_pronunciations: 2,
            average_score: 82,
            highest_score: 85,
        };

        history.merge("11-20", &stats);
        // (88 * 11 + 82 * 2) / 13 = 87.08
        assert_eq!(history.days()[0].score, 87);
        assert_eq!(history.days()[0].words, 13);

        history.merge("11-21", &stats);
        assert_eq!(history.days().len(), 2);
        assert_eq!(history.total_words(), 15);
        assert_eq!(history.highest_score(), 87);
        assert_eq!(history.average_score(), 85);
    }

    #[test]
    fn test_lease_release_is_idempotent() {
        let open = Arc::new(AtomicUsize::new(1));
        let mut lease = MicrophoneLease::new(Box::new(SimulatedStream {
            open_streams: open.clone(),
            live: true,
        }));

        lease.release();
        lease.release();
        drop(lease);

        assert_eq!(open.load(Ordering::SeqCst), 0);
    }
}
