use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Manages config directory and config file operations
#[derive(Clone)]
pub struct ConfigManager {
    pub(crate) config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);

        Ok(Self { config_dir })
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get path to a specific config file
    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    /// Ensure the config directory exists
    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Generate default configuration template as a string
    pub fn generate_default_config(&self) -> String {
        DEFAULT_CONFIG_TEMPLATE.to_string()
    }

    /// Write default configuration to config file
    pub fn write_default_config(&self, force: bool) -> Result<PathBuf> {
        let config_path = self.config_path("config.toml");

        if config_path.exists() && !force {
            return Err(eyre!(
                "Config file already exists at {}. Use --force to overwrite.",
                config_path.display()
            ));
        }

        self.ensure_config_dir()?;
        std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;

        Ok(config_path)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration format version (for future compatibility)
    pub version: String,
    pub server: ServerConfig,
    pub downloads: DownloadConfig,
    pub ui: UiConfig,
    pub performance: PerformanceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DownloadConfig {
    /// Where exports are saved; falls back to the platform download
    /// directory, then the working directory
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub filter_debounce_ms: u64,
    pub resize_debounce_ms: u64,
    /// Below this many terminal columns the table switches to the
    /// label-per-cell narrow layout
    pub narrow_width: u16,
    pub status_duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    pub event_poll_interval_ms: u64,
}

// Default implementations
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            server: ServerConfig::default(),
            downloads: DownloadConfig::default(),
            ui: UiConfig::default(),
            performance: PerformanceConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            filter_debounce_ms: 300,
            resize_debounce_ms: 250,
            narrow_width: 80,
            status_duration_ms: 5000,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            event_poll_interval_ms: 25,
        }
    }
}

// Configuration loading and merging
impl AppConfig {
    /// Load configuration from all layers (default → user)
    pub fn load(app_name: &str) -> Result<Self> {
        let mut config = AppConfig::default();

        if let Ok(user_config) = Self::load_user_config(app_name) {
            config.merge(user_config);
        }

        config.validate()?;

        Ok(config)
    }

    /// Load user configuration from the config directory, defaults when absent
    pub fn load_user_config(app_name: &str) -> Result<Self> {
        let manager = ConfigManager::new(app_name)?;
        let config_path = manager.config_path("config.toml");

        if !config_path.exists() {
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            eyre!(
                "Failed to read config file at {}: {}",
                config_path.display(),
                e
            )
        })?;

        toml::from_str(&content).map_err(|e| {
            eyre!(
                "Failed to parse config file at {}: {}",
                config_path.display(),
                e
            )
        })
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: AppConfig) {
        if other.version != AppConfig::default().version {
            self.version = other.version;
        }
        self.server.merge(other.server);
        self.downloads.merge(other.downloads);
        self.ui.merge(other.ui);
        self.performance.merge(other.performance);
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.base_url.is_empty() {
            return Err(eyre!("server.base_url must not be empty"));
        }
        if !self.server.base_url.starts_with("http://")
            && !self.server.base_url.starts_with("https://")
        {
            return Err(eyre!(
                "server.base_url must start with http:// or https://, got {}",
                self.server.base_url
            ));
        }
        if self.server.timeout_secs == 0 {
            return Err(eyre!("server.timeout_secs must be greater than 0"));
        }
        if self.ui.narrow_width == 0 {
            return Err(eyre!("ui.narrow_width must be greater than 0"));
        }
        if self.performance.event_poll_interval_ms == 0 {
            return Err(eyre!(
                "performance.event_poll_interval_ms must be greater than 0"
            ));
        }
        Ok(())
    }
}

impl ServerConfig {
    pub fn merge(&mut self, other: Self) {
        let default = ServerConfig::default();
        if other.base_url != default.base_url {
            self.base_url = other.base_url;
        }
        if other.timeout_secs != default.timeout_secs {
            self.timeout_secs = other.timeout_secs;
        }
    }
}

impl DownloadConfig {
    pub fn merge(&mut self, other: Self) {
        if other.dir.is_some() {
            self.dir = other.dir;
        }
    }

    /// Resolve the effective download directory
    pub fn resolve(&self) -> PathBuf {
        self.dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl UiConfig {
    pub fn merge(&mut self, other: Self) {
        let default = UiConfig::default();
        if other.filter_debounce_ms != default.filter_debounce_ms {
            self.filter_debounce_ms = other.filter_debounce_ms;
        }
        if other.resize_debounce_ms != default.resize_debounce_ms {
            self.resize_debounce_ms = other.resize_debounce_ms;
        }
        if other.narrow_width != default.narrow_width {
            self.narrow_width = other.narrow_width;
        }
        if other.status_duration_ms != default.status_duration_ms {
            self.status_duration_ms = other.status_duration_ms;
        }
    }
}

impl PerformanceConfig {
    pub fn merge(&mut self, other: Self) {
        let default = PerformanceConfig::default();
        if other.event_poll_interval_ms != default.event_poll_interval_ms {
            self.event_poll_interval_ms = other.event_poll_interval_ms;
        }
    }
}

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# admitui configuration
version = "0.1"

[server]
# Base URL of the backend service
base_url = "http://localhost:8000"
# Request timeout in seconds for search and export calls
timeout_secs = 30

[downloads]
# Where exported files are saved. Defaults to the platform download
# directory, then the working directory.
# dir = "/home/user/Downloads"

[ui]
# Quiet period after the last keystroke before the table filter runs
filter_debounce_ms = 300
# Quiet period after the last resize before the layout is recomputed
resize_debounce_ms = 250
# Below this many terminal columns each cell is rendered with its
# column header as a label
narrow_width = 80
# How long status messages stay on screen
status_duration_ms = 5000

[performance]
event_poll_interval_ms = 25
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_parses_to_defaults() {
        let parsed: AppConfig = toml::from_str(DEFAULT_CONFIG_TEMPLATE).expect("template parses");
        let default = AppConfig::default();
        assert_eq!(parsed.version, default.version);
        assert_eq!(parsed.server.base_url, default.server.base_url);
        assert_eq!(parsed.ui.filter_debounce_ms, default.ui.filter_debounce_ms);
        assert_eq!(parsed.ui.narrow_width, default.ui.narrow_width);
    }

    #[test]
    fn test_merge_keeps_defaults_for_unset_sections() {
        let mut config = AppConfig::default();
        let other: AppConfig =
            toml::from_str("[server]\nbase_url = \"https://example.com\"\n").expect("parses");
        config.merge(other);
        assert_eq!(config.server.base_url, "https://example.com");
        assert_eq!(config.server.timeout_secs, 30);
        assert_eq!(config.ui.filter_debounce_ms, 300);
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = AppConfig::default();
        config.server.base_url = "localhost:8000".to_string();
        assert!(config.validate().is_err());
        config.server.base_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_intervals() {
        let mut config = AppConfig::default();
        config.server.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.ui.narrow_width = 0;
        assert!(config.validate().is_err());
    }
}
