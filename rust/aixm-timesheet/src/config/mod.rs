//! Configuration management.
//!
//! Configuration is read once at startup from built-in defaults, an optional
//! config file, environment variables and a `.env` file, then validated and
//! passed by value to the code that needs it. Nothing here is global.
//!
//! ```rust,ignore
//! use aixm_timesheet::config::{AppConfig, ConfigValidator};
//!
//! let config = AppConfig::load(None)?;
//! ConfigValidator::validate(&config)?;
//! ```

pub mod error;
pub mod validator;

pub use error::{ConfigResult, ConfigurationError};
pub use validator::ConfigValidator;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::BackendKind;

/// Default config file looked up relative to the working directory.
const DEFAULT_CONFIG_FILE: &str = "config/aixm-timesheet";

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Text-understanding backend selection and settings.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Input and output locations.
    #[serde(default)]
    pub io: IoConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration and validate it.
    ///
    /// Sources, later ones winning:
    /// 1. Default values
    /// 2. `config/aixm-timesheet.{toml,yaml,json}` or the file at `path`
    /// 3. `AIXM__*` environment variables (e.g. `AIXM__BACKEND__KIND=rules`)
    /// 4. `GEMINI_API_KEY` / `GEMINI_MODEL`
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let config = Self::load_unchecked(path)?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Load configuration without validation.
    pub fn load_unchecked(path: Option<&Path>) -> ConfigResult<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("AIXM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| {
                ConfigurationError::invalid(
                    format!("Failed to read configuration: {e}"),
                    "Check the config file syntax and AIXM__* environment variables",
                )
            })?;

        let config: AppConfig = settings.try_deserialize().map_err(|e| {
            ConfigurationError::invalid(
                format!("Failed to parse configuration: {e}"),
                "Check value types, e.g. AIXM__BACKEND__KIND must be mock, rules or gemini",
            )
        })?;

        Ok(config.with_env_overrides())
    }

    /// Apply the well-known provider environment variables.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.trim().is_empty() {
                self.backend.gemini.api_key = Some(key);
            }
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            if !model.trim().is_empty() {
                self.backend.gemini.model = model;
            }
        }
        self
    }
}

/// Backend selection and connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Which backend converts text to schedule JSON.
    #[serde(default)]
    pub kind: BackendKind,
    /// Request timeout in seconds for network backends.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Gemini settings.
    #[serde(default)]
    pub gemini: GeminiConfig,
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            request_timeout_secs: default_request_timeout(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl BackendConfig {
    /// Request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Google Gemini settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key, usually from `GEMINI_API_KEY`.
    pub api_key: Option<String>,
    /// Model identifier.
    #[serde(default = "default_gemini_model")]
    pub model: String,
    /// API base URL.
    #[serde(default = "default_gemini_url")]
    pub base_url: String,
}

fn default_gemini_model() -> String {
    "gemini-pro".to_string()
}

fn default_gemini_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            base_url: default_gemini_url(),
        }
    }
}

/// Input and output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoConfig {
    /// File holding the schedule text.
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,
    /// File receiving the AIXM XML.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

fn default_input_path() -> PathBuf {
    PathBuf::from("schedule.txt")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("aixm_output.xml")
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            output_path: default_output_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Whether stdout logs are JSON.
    #[serde(default)]
    pub json: bool,
    /// Optional log file, written in plain text.
    #[serde(default = "default_log_file")]
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("app.log"))
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            file: default_log_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env() {
        // SAFETY: These are test environment variables and we're in a controlled test environment
        unsafe {
            env::remove_var("GEMINI_API_KEY");
            env::remove_var("GEMINI_MODEL");
            env::remove_var("AIXM__BACKEND__KIND");
            env::remove_var("AIXM__IO__OUTPUT_PATH");
            env::remove_var("AIXM__BACKEND__REQUEST_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.backend.kind, BackendKind::Gemini);
        assert_eq!(config.backend.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.backend.gemini.model, "gemini-pro");
        assert!(config.backend.gemini.api_key.is_none());
        assert_eq!(config.io.input_path, PathBuf::from("schedule.txt"));
        assert_eq!(config.io.output_path, PathBuf::from("aixm_output.xml"));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, Some(PathBuf::from("app.log")));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        // SAFETY: These are test environment variables and we're in a controlled test environment
        unsafe {
            env::set_var("GEMINI_API_KEY", "key-from-env");
            env::set_var("AIXM__BACKEND__KIND", "rules");
            env::set_var("AIXM__BACKEND__REQUEST_TIMEOUT_SECS", "5");
            env::set_var("AIXM__IO__OUTPUT_PATH", "out/timesheet.xml");
        }

        let config = AppConfig::load_unchecked(None).unwrap();

        assert_eq!(config.backend.kind, BackendKind::Rules);
        assert_eq!(config.backend.request_timeout_secs, 5);
        assert_eq!(config.backend.gemini.api_key.as_deref(), Some("key-from-env"));
        assert_eq!(config.io.output_path, PathBuf::from("out/timesheet.xml"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_load_from_explicit_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "[backend]\nkind = \"mock\"\n\n[io]\ninput_path = \"in.txt\"\n\n[logging]\njson = true\n",
        )
        .unwrap();

        let config = AppConfig::load(Some(path.as_path())).unwrap();

        assert_eq!(config.backend.kind, BackendKind::Mock);
        assert_eq!(config.io.input_path, PathBuf::from("in.txt"));
        assert_eq!(config.io.output_path, PathBuf::from("aixm_output.xml"));
        assert!(config.logging.json);
    }

    #[test]
    #[serial]
    fn test_missing_explicit_file_is_an_error() {
        clear_env();
        let err = AppConfig::load_unchecked(Some(Path::new("/nonexistent/aixm.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read configuration"));
    }
}
