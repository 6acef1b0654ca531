//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides;
//! command-line flags are applied on top by the binary.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub events: EventsConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub websocket: WebSocketConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the built dashboard (index.html + wasm bundle)
    #[serde(default = "default_ui_dir")]
    pub ui_dir: PathBuf,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    2802
}

fn default_ui_dir() -> PathBuf {
    PathBuf::from("eventdeck-ui/dist")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            ui_dir: default_ui_dir(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Event store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EventsConfig {
    /// Number of most recent events kept in memory
    #[serde(default = "default_retention")]
    pub retention: usize,
}

fn default_retention() -> usize {
    200
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            retention: default_retention(),
        }
    }
}

/// Dashboard display configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    /// Start the dashboard in dark mode
    #[serde(default)]
    pub dark_mode: bool,
}

impl DisplayConfig {
    pub fn mode(&self) -> DisplayMode {
        if self.dark_mode {
            DisplayMode::Dark
        } else {
            DisplayMode::Light
        }
    }
}

/// Theme the dashboard starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Light,
    Dark,
}

/// WebSocket hub configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebSocketConfig {
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

fn default_max_connections() -> usize {
    1000
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Whether log lines should be emitted as JSON
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Standard config file locations, in search order
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("eventdeck").join("config.toml")),
            Some(PathBuf::from("/etc/eventdeck/config.toml")),
            Some(PathBuf::from("./eventdeck.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load from default locations or environment
    ///
    /// Returns the file that was used, if any.
    pub fn load_default() -> Result<(Self, Option<PathBuf>), ConfigError> {
        Self::load_first(&Self::default_paths())
    }

    /// Load the first existing file in `paths`, else defaults plus environment
    ///
    /// A file that exists but cannot be loaded is an error rather than being
    /// skipped.
    pub fn load_first(paths: &[PathBuf]) -> Result<(Self, Option<PathBuf>), ConfigError> {
        for path in paths {
            if path.exists() {
                let config = Self::load_with_env(path)?;
                return Ok((config, Some(path.clone())));
            }
        }
        Ok((Self::from_env(), None))
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    ///
    /// Unparsable numeric or boolean values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("EVENTDECK_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("EVENTDECK_PORT").and_then(|s| s.parse().ok()) {
            self.server.port = port;
        }
        if let Some(dir) = lookup("EVENTDECK_UI_DIR") {
            self.server.ui_dir = PathBuf::from(dir);
        }
        if let Some(retention) = lookup("EVENTDECK_RETENTION").and_then(|s| s.parse().ok()) {
            self.events.retention = retention;
        }
        if let Some(dark) = lookup("EVENTDECK_DARK_MODE").and_then(|s| parse_bool(&s)) {
            self.display.dark_mode = dark;
        }
        if let Some(level) = lookup("EVENTDECK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("EVENTDECK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Check values that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.parse::<IpAddr>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "server.host must be an IP address, got {:?}",
                self.server.host
            )));
        }
        if self.events.retention == 0 {
            return Err(ConfigError::Invalid(
                "events.retention must be at least 1".to_string(),
            ));
        }
        if self.websocket.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "websocket.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Eventdeck Configuration
#
# Environment variables override these settings:
# - EVENTDECK_HOST
# - EVENTDECK_PORT
# - EVENTDECK_UI_DIR
# - EVENTDECK_RETENTION
# - EVENTDECK_DARK_MODE
# - EVENTDECK_LOG_LEVEL
# - EVENTDECK_LOG_FORMAT

[server]
# Listen address
host = "0.0.0.0"

# Listen port
port = 2802

# Directory with the built dashboard
ui_dir = "eventdeck-ui/dist"

[events]
# Number of most recent events kept in memory
retention = 200

[display]
# Start the dashboard in dark mode
dark_mode = false

[websocket]
# Maximum number of concurrent dashboard connections
max_connections = 1000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.addr(), "0.0.0.0:2802");
        assert_eq!(config.events.retention, 200);
        assert_eq!(config.display.mode(), DisplayMode::Light);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.server.port, 2802);
        assert_eq!(config.events.retention, 200);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[events]\nretention = 50\n\n[display]\ndark_mode = true").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.events.retention, 50);
        assert_eq!(config.display.mode(), DisplayMode::Dark);
        assert_eq!(config.server.port, 2802);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[events\nretention = ").unwrap();

        let result = Config::load(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_first_picks_first_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("eventdeck.toml");
        std::fs::write(&present, "[server]\nport = 9100\n").unwrap();
        let paths = vec![dir.path().join("absent.toml"), present.clone()];

        let (config, used) = Config::load_first(&paths).unwrap();
        assert_eq!(used, Some(present));
        assert_eq!(config.server.port, 9100);
    }

    #[test]
    fn test_load_first_reports_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("eventdeck.toml");
        std::fs::write(&broken, "[events\nretention = ").unwrap();

        let result = Config::load_first(&[broken]);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_first_without_files_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let (_, used) = Config::load_first(&[dir.path().join("absent.toml")]).unwrap();
        assert_eq!(used, None);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("EVENTDECK_PORT", "9000"),
            ("EVENTDECK_RETENTION", "not-a-number"),
            ("EVENTDECK_DARK_MODE", "yes"),
            ("EVENTDECK_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.events.retention, 200);
        assert!(config.display.dark_mode);
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_validate_rejects_zero_retention() {
        let mut config = Config::default();
        config.events.retention = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_hostname() {
        let mut config = Config::default();
        config.server.host = "localhost".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_display_mode_serialization() {
        assert_eq!(serde_json::to_string(&DisplayMode::Dark).unwrap(), "\"dark\"");
    }
}
