use admitui::config::{AppConfig, ConfigManager};
use std::fs;
use tempfile::TempDir;

// Helper to create a temporary config directory for testing
fn setup_test_config_dir() -> (TempDir, ConfigManager) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_manager = ConfigManager::with_dir(temp_dir.path().to_path_buf());
    (temp_dir, config_manager)
}

#[test]
fn test_default_config() {
    let config = AppConfig::default();

    assert_eq!(config.version, "0.1");

    // Check server defaults
    assert_eq!(config.server.base_url, "http://localhost:8000");
    assert_eq!(config.server.timeout_secs, 30);

    // Check ui defaults: the reference debounce and layout values
    assert_eq!(config.ui.filter_debounce_ms, 300);
    assert_eq!(config.ui.resize_debounce_ms, 250);
    assert_eq!(config.ui.narrow_width, 80);
    assert_eq!(config.ui.status_duration_ms, 5000);

    // Check performance defaults
    assert_eq!(config.performance.event_poll_interval_ms, 25);

    // Download dir is unset by default
    assert!(config.downloads.dir.is_none());
}

#[test]
fn test_generate_default_config() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let template = config_manager.generate_default_config();

    // Check that template contains expected sections
    assert!(template.contains("[server]"));
    assert!(template.contains("[downloads]"));
    assert!(template.contains("[ui]"));
    assert!(template.contains("[performance]"));

    // Check that it contains version
    assert!(template.contains("version = \"0.1\""));
}

#[test]
fn test_write_default_config() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let config_path = config_manager
        .write_default_config(false)
        .expect("Failed to write config");

    assert!(config_path.exists());

    let content = fs::read_to_string(&config_path).expect("Failed to read config");
    assert!(content.contains("[server]"));
    assert!(content.contains("version = \"0.1\""));
}

#[test]
fn test_write_config_without_force_fails_if_exists() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    config_manager
        .write_default_config(false)
        .expect("First write should succeed");

    let result = config_manager.write_default_config(false);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("already exists"));
}

#[test]
fn test_write_config_with_force_overwrites() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let first_path = config_manager
        .write_default_config(false)
        .expect("First write should succeed");

    let second_path = config_manager
        .write_default_config(true)
        .expect("Second write with force should succeed");

    assert_eq!(first_path, second_path);
    assert!(first_path.exists());
}

#[test]
fn test_written_template_round_trips_through_load() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    let config_path = config_manager
        .write_default_config(false)
        .expect("write succeeds");

    let content = fs::read_to_string(config_path).expect("read back");
    let parsed: AppConfig = toml::from_str(&content).expect("template parses");
    parsed.validate().expect("template validates");
    assert_eq!(parsed.ui.filter_debounce_ms, 300);
}

#[test]
fn test_partial_user_config_merges_over_defaults() {
    let mut config = AppConfig::default();
    let user: AppConfig = toml::from_str(
        r#"
        [server]
        base_url = "https://college.example.com"

        [ui]
        narrow_width = 100
        "#,
    )
    .expect("user config parses");

    config.merge(user);
    assert_eq!(config.server.base_url, "https://college.example.com");
    assert_eq!(config.server.timeout_secs, 30);
    assert_eq!(config.ui.narrow_width, 100);
    assert_eq!(config.ui.filter_debounce_ms, 300);
}
