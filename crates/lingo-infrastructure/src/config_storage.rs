//! TOML-backed storage for [`LingoConfig`].
//!
//! A missing or empty file means "use defaults"; a file that exists but does
//! not parse is an error so that a typo never silently resets settings.

use crate::paths::LingoPaths;
use lingo_core::config::LingoConfig;
use lingo_core::{LingoError, Result};
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

/// Reads and writes the configuration file.
#[derive(Debug, Clone)]
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates a storage handle for an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a storage handle for the default `~/.config/lingo/config.toml`.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(LingoPaths::config_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration.
    ///
    /// # Returns
    ///
    /// - `Ok(config)`: parsed config, or defaults if the file is missing or empty
    /// - `Err(LingoError::Serialization)`: the file exists but is not valid TOML
    /// - `Err(LingoError::Io)`: the file could not be read
    pub fn load(&self) -> Result<LingoConfig> {
        if !self.path.exists() {
            tracing::debug!("[Config] No config at {:?}, using defaults", self.path);
            return Ok(LingoConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(LingoConfig::default());
        }

        let config: LingoConfig = toml::from_str(&content)?;
        tracing::info!("[Config] Loaded config from {:?}", self.path);
        Ok(config)
    }

    /// Saves the configuration atomically (tmp file + rename).
    pub fn save(&self, config: &LingoConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml_string = toml::to_string_pretty(config)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        tracing::info!("[Config] Saved config to {:?}", self.path);

        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| LingoError::io("Path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| LingoError::io("Path has no file name"))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}
