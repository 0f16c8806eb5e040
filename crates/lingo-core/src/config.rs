//! Application configuration model.
//!
//! Loaded from `~/.config/lingo/config.toml` by the infrastructure layer.
//! Every section is optional; missing keys fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoint of the backend command processor.
pub const DEFAULT_API_ENDPOINT: &str = "http://127.0.0.1:8000/api/process";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct LingoConfig {
    pub api: ApiConfig,
    pub timing: TimingConfig,
    pub session: SessionDefaults,
    /// Seed for canned-reply and scoring randomness. `None` seeds from entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_seed: Option<u64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    pub endpoint: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_API_ENDPOINT.to_string(),
        }
    }
}

/// Simulated latencies, in milliseconds.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    pub scene_load_delay_ms: u64,
    pub ai_reply_delay_ms: u64,
    pub recording_ms: u64,
    pub scoring_delay_ms: u64,
    pub advance_delay_ms: u64,
    pub translation_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            scene_load_delay_ms: 1000,
            ai_reply_delay_ms: 1500,
            recording_ms: 3000,
            scoring_delay_ms: 1000,
            advance_delay_ms: 2000,
            translation_delay_ms: 800,
        }
    }
}

impl TimingConfig {
    /// All delays set to zero.
    pub fn immediate() -> Self {
        Self {
            scene_load_delay_ms: 0,
            ai_reply_delay_ms: 0,
            recording_ms: 0,
            scoring_delay_ms: 0,
            advance_delay_ms: 0,
            translation_delay_ms: 0,
        }
    }

    pub fn scene_load_delay(&self) -> Duration {
        Duration::from_millis(self.scene_load_delay_ms)
    }

    pub fn ai_reply_delay(&self) -> Duration {
        Duration::from_millis(self.ai_reply_delay_ms)
    }

    pub fn recording(&self) -> Duration {
        Duration::from_millis(self.recording_ms)
    }

    pub fn scoring_delay(&self) -> Duration {
        Duration::from_millis(self.scoring_delay_ms)
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }

    pub fn translation_delay(&self) -> Duration {
        Duration::from_millis(self.translation_delay_ms)
    }
}

/// Initial presentation toggles for a new session.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SessionDefaults {
    pub bilingual_mode: bool,
    pub show_word_panel: bool,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            bilingual_mode: true,
            show_word_panel: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: LingoConfig = toml::from_str(
            r#"
            reply_seed = 7

            [timing]
            ai_reply_delay_ms = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.reply_seed, Some(7));
        assert_eq!(config.timing.ai_reply_delay_ms, 10);
        assert_eq!(config.timing.scene_load_delay_ms, 1000);
        assert_eq!(config.api.endpoint, DEFAULT_API_ENDPOINT);
        assert!(config.session.bilingual_mode);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: LingoConfig = toml::from_str("").unwrap();
        assert_eq!(config, LingoConfig::default());
    }
}
