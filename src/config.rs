//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub demo: DemoConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend proxy connection
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Existing `session_id` cookie value to reuse
    #[serde(default)]
    pub session_cookie: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            session_cookie: None,
        }
    }
}

/// Dashboard view settings
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Lookback window of the pipeline chart
    #[serde(default = "default_pipeline_months")]
    pub pipeline_months: u32,
}

fn default_pipeline_months() -> u32 {
    12
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            pipeline_months: default_pipeline_months(),
        }
    }
}

/// Demo backend settings
#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    #[serde(default = "default_demo_host")]
    pub host: String,

    #[serde(default = "default_demo_port")]
    pub port: u16,

    /// When false every caller counts as signed in
    #[serde(default)]
    pub require_session: bool,

    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default = "default_records")]
    pub records: usize,

    /// Where login/logout redirect, and the CORS origin
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

fn default_demo_host() -> String {
    "127.0.0.1".to_string()
}

fn default_demo_port() -> u16 {
    8000
}

fn default_seed() -> u64 {
    42
}

fn default_records() -> usize {
    500
}

fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            host: default_demo_host(),
            port: default_demo_port(),
            require_session: false,
            seed: default_seed(),
            records: default_records(),
            frontend_url: default_frontend_url(),
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

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("pipeline-dashboard").join("config.toml")),
            Some(PathBuf::from("/etc/pipeline-dashboard/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(url) = var("PIPELINE_API_URL") {
            self.api.base_url = url;
        }
        if let Some(session) = var("PIPELINE_SESSION") {
            self.api.session_cookie = Some(session).filter(|s| !s.is_empty());
        }
        if let Some(timeout) = var("PIPELINE_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.api.timeout_secs = t;
            }
        }

        // Demo overrides
        if let Some(host) = var("PIPELINE_DEMO_HOST") {
            self.demo.host = host;
        }
        if let Some(port) = var("PIPELINE_DEMO_PORT") {
            if let Ok(p) = port.parse() {
                self.demo.port = p;
            }
        }
        if let Some(flag) = var("PIPELINE_DEMO_REQUIRE_SESSION") {
            self.demo.require_session = matches!(flag.as_str(), "1" | "true" | "yes");
        }

        // Logging overrides
        if let Some(level) = var("PIPELINE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("PIPELINE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Pipeline Dashboard Configuration
#
# Environment variables override these settings:
# - PIPELINE_API_URL
# - PIPELINE_SESSION
# - PIPELINE_TIMEOUT_SECS
# - PIPELINE_DEMO_HOST
# - PIPELINE_DEMO_PORT
# - PIPELINE_DEMO_REQUIRE_SESSION
# - PIPELINE_LOG_LEVEL
# - PIPELINE_LOG_FORMAT

[api]
# Backend proxy base URL
base_url = "http://localhost:8000"

# Request timeout in seconds
timeout_secs = 30

# Reuse an existing session cookie value
# session_cookie = ""

[dashboard]
# Months shown in the pipeline chart
pipeline_months = 12

[demo]
# Demo backend bind address
host = "127.0.0.1"
port = 8000

# Require a login before data endpoints answer
require_session = false

# Dataset generation
seed = 42
records = 500

# Login/logout redirect target and allowed CORS origin
frontend_url = "http://localhost:3000"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
