//! Configuration validation.
//!
//! Runs before any conversion so that a missing credential or an unusable
//! setting stops the program with every problem listed at once.

use tracing_subscriber::EnvFilter;

use super::error::{ConfigResult, ConfigurationError};
use super::{AppConfig, BackendConfig, IoConfig, LoggingConfig};
use crate::backend::BackendKind;

/// Checks a loaded [`AppConfig`] for missing or contradictory settings.
///
/// | Backend | Needs API key | Needs timeout > 0 |
/// |---------|---------------|-------------------|
/// | mock    | no            | no                |
/// | rules   | no            | no                |
/// | gemini  | yes           | yes               |
#[derive(Debug)]
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the entire application configuration.
    pub fn validate(config: &AppConfig) -> ConfigResult<()> {
        let mut errors = Vec::new();

        errors.extend(Self::validate_backend(&config.backend));
        errors.extend(Self::validate_io(&config.io));
        errors.extend(Self::validate_logging(&config.logging));

        match ConfigurationError::from_list(errors) {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }

    /// Validate backend settings.
    pub fn validate_backend(config: &BackendConfig) -> Vec<ConfigurationError> {
        let mut errors = Vec::new();

        if config.kind != BackendKind::Gemini {
            return errors;
        }

        let has_key = config
            .gemini
            .api_key
            .as_ref()
            .is_some_and(|k| !k.trim().is_empty());
        if !has_key {
            errors.push(ConfigurationError::missing_required(
                "Gemini API key",
                "Converting schedules with the gemini backend",
                "GEMINI_API_KEY (or choose AIXM__BACKEND__KIND=rules / mock)",
            ));
        }

        if config.request_timeout_secs == 0 {
            errors.push(ConfigurationError::invalid(
                "backend.request_timeout_secs must be greater than 0",
                "Set AIXM__BACKEND__REQUEST_TIMEOUT_SECS to a positive number of seconds",
            ));
        }

        if config.gemini.model.trim().is_empty() {
            errors.push(ConfigurationError::invalid(
                "backend.gemini.model is empty",
                "Set GEMINI_MODEL or AIXM__BACKEND__GEMINI__MODEL",
            ));
        }

        errors
    }

    /// Validate input and output locations.
    pub fn validate_io(config: &IoConfig) -> Vec<ConfigurationError> {
        let mut errors = Vec::new();

        if config.input_path.as_os_str().is_empty() {
            errors.push(ConfigurationError::invalid(
                "io.input_path is empty",
                "Set AIXM__IO__INPUT_PATH or pass --input",
            ));
        }
        if config.output_path.as_os_str().is_empty() {
            errors.push(ConfigurationError::invalid(
                "io.output_path is empty",
                "Set AIXM__IO__OUTPUT_PATH or pass --output",
            ));
        }

        errors
    }

    /// Validate the log filter directive.
    pub fn validate_logging(config: &LoggingConfig) -> Vec<ConfigurationError> {
        match EnvFilter::try_new(&config.level) {
            Ok(_) => Vec::new(),
            Err(e) => vec![ConfigurationError::invalid(
                format!("logging.level '{}' is not a valid filter: {e}", config.level),
                "Use a level such as error, warn, info, debug or trace",
            )],
        }
    }
}
