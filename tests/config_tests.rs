use formhub_display::config::{ConfigManager, DisplayConfig};
use formhub_display::DisplayError;
use tempfile::TempDir;

#[test]
fn missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let manager = ConfigManager::with_base_dir(dir.path());
    assert_eq!(manager.load().unwrap(), DisplayConfig::default());
    assert!(manager.path().ends_with("config.json"));
}

#[test]
fn save_then_load_preserves_settings() {
    let dir = TempDir::new().unwrap();
    let manager = ConfigManager::with_base_dir(dir.path().join("nested"));
    let config = DisplayConfig {
        currency_symbol: "$".into(),
        cache_capacity: 16,
        ..DisplayConfig::default()
    };

    manager.save(&config).unwrap();
    assert_eq!(manager.load().unwrap(), config);
    assert!(!manager.path().with_extension("json.tmp").exists());
}

#[test]
fn partial_files_fill_in_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("display.json");
    std::fs::write(&path, r#"{"cache_capacity": 8}"#).unwrap();

    let config = ConfigManager::at_path(&path).load().unwrap();
    assert_eq!(config.cache_capacity, 8);
    assert_eq!(config.currency_symbol, "₱");
}

#[test]
fn invalid_settings_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("display.json");
    std::fs::write(&path, r#"{"cache_capacity": 0}"#).unwrap();
    assert!(matches!(
        ConfigManager::at_path(&path).load(),
        Err(DisplayError::Config(_))
    ));

    std::fs::write(&path, "[").unwrap();
    assert!(matches!(
        ConfigManager::at_path(&path).load(),
        Err(DisplayError::Serde(_))
    ));
}
