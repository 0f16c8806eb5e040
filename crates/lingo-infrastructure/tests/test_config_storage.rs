use lingo_core::config::{LingoConfig, TimingConfig};
use lingo_infrastructure::ConfigStorage;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_missing_file_returns_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let storage = ConfigStorage::new(temp_dir.path().join("config.toml"));

    let config = storage.load().expect("Should load defaults");
    assert_eq!(config, LingoConfig::default());
}

#[test]
fn test_load_empty_file_returns_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "   \n").unwrap();

    let config = ConfigStorage::new(path).load().unwrap();
    assert_eq!(config, LingoConfig::default());
}

#[test]
fn test_save_and_load_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    // Nested directory must be created on save
    let path = temp_dir.path().join("lingo").join("config.toml");
    let storage = ConfigStorage::new(path.clone());

    let mut config = LingoConfig::default();
    config.api.endpoint = "http://localhost:9000/api/process".to_string();
    config.timing = TimingConfig::immediate();
    config.session.bilingual_mode = false;
    config.reply_seed = Some(42);

    storage.save(&config).expect("Should save config");
    assert!(path.exists());

    let loaded = storage.load().expect("Should load config");
    assert_eq!(loaded, config);
}

#[test]
fn test_malformed_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[timing\nai_reply_delay_ms = ").unwrap();

    let err = ConfigStorage::new(path).load().unwrap_err();
    assert!(matches!(
        err,
        lingo_core::LingoError::Serialization { ref format, .. } if format == "TOML"
    ));
}
