//! Path resolution for lingo configuration files.
//!
//! ```text
//! ~/.config/lingo/             # Config directory (platform config dir)
//! └── config.toml              # Application configuration
//! ```

use lingo_core::{LingoError, Result};
use std::path::PathBuf;

const APP_DIR_NAME: &str = "lingo";
const CONFIG_FILE_NAME: &str = "config.toml";

pub struct LingoPaths;

impl LingoPaths {
    /// Returns the lingo configuration directory (e.g. `~/.config/lingo/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or_else(|| LingoError::config("Cannot find home directory"))
    }

    /// Returns the path of `config.toml`.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_lives_in_config_dir() {
        // Skip on hosts without a resolvable config directory.
        let Ok(dir) = LingoPaths::config_dir() else {
            return;
        };
        let file = LingoPaths::config_file().unwrap();

        assert!(dir.ends_with("lingo"));
        assert_eq!(file.parent(), Some(dir.as_path()));
        assert!(file.ends_with("config.toml"));
    }
}
