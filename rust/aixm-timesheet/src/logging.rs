//! Logging setup and stage timing.
//!
//! Logs go to stdout (plain or JSON) and, unless disabled, to a plain-text
//! log file. `RUST_LOG` takes precedence over the configured level.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ConfigurationError, LoggingConfig};
use crate::error::{ConvertError, ConvertResult};

/// Install the global tracing subscriber.
///
/// Fails if the filter is invalid, the log file cannot be opened, or a
/// subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> ConvertResult<()> {
    let filter = build_filter(&config.level)?;

    let log_file = match config.file.as_deref() {
        Some(path) => open_log_file(path)?,
        None => None,
    };

    let json_layer = config.json.then(|| fmt::layer().json());
    let plain_layer = (!config.json).then(|| fmt::layer());
    let file_layer = log_file.map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(plain_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| {
            ConvertError::Config(ConfigurationError::invalid(
                format!("Failed to install logger: {e}"),
                "Initialize logging once per process",
            ))
        })
}

fn build_filter(level: &str) -> ConvertResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|e| {
        ConvertError::Config(ConfigurationError::invalid(
            format!("logging.level '{level}' is not a valid filter: {e}"),
            "Use a level such as error, warn, info, debug or trace",
        ))
    })
}

/// Open `path` for appending. An empty path disables file logging.
fn open_log_file(path: &Path) -> ConvertResult<Option<File>> {
    if path.as_os_str().is_empty() {
        return Ok(None);
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(Some)
        .map_err(|e| ConvertError::io(path, e))
}

/// Operation timer for measuring and logging execution duration.
///
/// # Examples
///
/// ```rust,ignore
/// use aixm_timesheet::logging::OpTimer;
///
/// let timer = OpTimer::new("converter", "render");
/// let result = render(&records);
/// timer.finish_with_result(result.as_ref());
/// ```
#[derive(Debug)]
pub struct OpTimer {
    /// Component being timed (e.g., "converter", "app").
    component: String,
    /// Operation being performed (e.g., "parse", "write").
    operation: String,
    start: Instant,
}

impl OpTimer {
    /// Creates a new operation timer and logs the start.
    #[must_use]
    pub fn new(component: impl Into<String>, operation: impl Into<String>) -> Self {
        let component = component.into();
        let operation = operation.into();

        tracing::debug!(
            component = %component,
            operation = %operation,
            "Operation started"
        );

        Self {
            component,
            operation,
            start: Instant::now(),
        }
    }

    /// Finishes the timer with result-aware logging.
    ///
    /// Success is logged at debug level so a normal run stays quiet; failures
    /// are logged as errors with their message.
    pub fn finish_with_result<T, E: std::fmt::Display>(self, result: Result<&T, &E>) {
        let duration_ms = self.start.elapsed().as_millis();

        match result {
            Ok(_) => {
                tracing::debug!(
                    component = %self.component,
                    operation = %self.operation,
                    duration_ms = duration_ms,
                    "Operation completed successfully"
                );
            }
            Err(e) => {
                tracing::error!(
                    component = %self.component,
                    operation = %self.operation,
                    duration_ms = duration_ms,
                    error = %e,
                    "Operation failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_timer_creation() {
        let timer = OpTimer::new("converter", "parse");
        assert_eq!(timer.component, "converter");
        assert_eq!(timer.operation, "parse");
    }

    #[test]
    fn test_op_timer_finish_with_result() {
        let ok: Result<i32, String> = Ok(42);
        OpTimer::new("converter", "render").finish_with_result(ok.as_ref());

        let err: Result<i32, String> = Err("Record 0 is not a mapping".to_string());
        OpTimer::new("converter", "render").finish_with_result(err.as_ref());
    }

    #[test]
    fn test_empty_log_path_disables_file() {
        assert!(open_log_file(Path::new("")).unwrap().is_none());
    }

    #[test]
    fn test_log_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");

        assert!(open_log_file(&path).unwrap().is_some());
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_log_file() {
        let err = open_log_file(Path::new("/nonexistent/dir/app.log")).unwrap_err();
        assert_eq!(err.stage(), "io");
    }
}
