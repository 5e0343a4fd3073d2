//! Configuration management.
//!
//! Settings come from, in increasing priority: built-in defaults (the API key
//! default reads `OUTSCRAPER_API_KEY`), an optional TOML file, and
//! `OUTSCRAPER_MCP_*` environment variables using `__` as the section
//! separator (e.g. `OUTSCRAPER_MCP_API__TIMEOUT_SECS=60`).
//!
//! ```toml
//! [api]
//! api_key = "your-api-key"
//! base_url = "https://api.app.outscraper.com"
//! client_tag = "MCP Server"
//! timeout_secs = 30
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::client::{DEFAULT_BASE_URL, DEFAULT_CLIENT_TAG};

/// Value used when no API key is configured
pub const PLACEHOLDER_API_KEY: &str = "api_key";

const CONFIG_FILE_NAME: &str = "outscraper-mcp.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Outscraper API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Outscraper API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_key")]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_client_tag")]
    pub client_tag: String,

    /// Deadline for one request round trip, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            base_url: default_base_url(),
            client_tag: default_client_tag(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Whether the API key is still the placeholder
    pub fn has_placeholder_key(&self) -> bool {
        self.api_key.is_empty() || self.api_key == PLACEHOLDER_API_KEY
    }
}

fn default_api_key() -> String {
    std::env::var("OUTSCRAPER_API_KEY").unwrap_or_else(|_| PLACEHOLDER_API_KEY.to_string())
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_client_tag() -> String {
    DEFAULT_CLIENT_TAG.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
        }

        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }
}

/// Load configuration: defaults, then an optional file, then environment
///
/// Without a file the `OUTSCRAPER_MCP_*` variables still apply.
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    build_config(path, env_source())
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix("OUTSCRAPER_MCP")
        .prefix_separator("_")
        .separator("__")
}

fn build_config(
    path: Option<&Path>,
    env: config::Environment,
) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    builder.add_source(env).build()?.try_deserialize()
}

/// Look for a config file in the working directory, then the user config dir
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    default_config_path().filter(|path| path.is_file())
}

/// `<config_dir>/outscraper-mcp/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("outscraper-mcp").join("config.toml"))
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://api.app.outscraper.com");
        assert_eq!(config.api.client_tag, "MCP Server");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_placeholder_key_detection() {
        let mut api = ApiConfig::default();
        api.api_key = PLACEHOLDER_API_KEY.to_string();
        assert!(api.has_placeholder_key());
        api.api_key = "real".to_string();
        assert!(!api.has_placeholder_key());
    }

    #[test]
    fn test_config_file_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let toml_content = r#"
[api]
api_key = "test-key"
base_url = "http://localhost:9999"
timeout_secs = 5

[logging]
level = "debug"
"#;
        std::fs::write(&path, toml_content).unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.api.api_key, "test-key");
        assert_eq!(config.api.base_url, "http://localhost:9999");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api.client_tag, "MCP Server");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_config_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.api.api_key = "saved-key".to_string();
        config.api.timeout_secs = 12;
        config.save(&path).unwrap();

        let loaded = load_config(Some(path.as_path())).unwrap();
        assert_eq!(loaded.api.api_key, "saved-key");
        assert_eq!(loaded.api.timeout_secs, 12);
    }

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        env_source().source(Some(vars))
    }

    #[test]
    fn test_env_overrides_without_file() {
        let config = build_config(
            None,
            env(&[
                ("OUTSCRAPER_MCP_API__BASE_URL", "http://env.example"),
                ("OUTSCRAPER_MCP_LOGGING__LEVEL", "warn"),
            ]),
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://env.example");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.api.client_tag, "MCP Server");
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"http://file.example\"\n").unwrap();

        let config = build_config(
            Some(path.as_path()),
            env(&[("OUTSCRAPER_MCP_API__BASE_URL", "http://env.example")]),
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://env.example");
    }

    #[test]
    fn test_config_file_nonexistent() {
        let result = load_config(Some(Path::new("/nonexistent/outscraper.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_file_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");
        std::fs::write(&path, "invalid = toml = content").unwrap();

        assert!(load_config(Some(path.as_path())).is_err());
    }
}
