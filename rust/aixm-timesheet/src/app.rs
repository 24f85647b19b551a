//! Application runner: read, pre-validate, convert, write.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::{AppConfig, ConfigResult, ConfigValidator};
use crate::converter::ScheduleConverter;
use crate::error::{ConvertError, ConvertResult};
use crate::logging::OpTimer;
use crate::validate::validate_schedule_text;

/// Per-invocation choices that are not part of the configuration.
#[derive(Debug, Clone, Default)]
pub struct RunInput {
    /// Schedule text given inline; `io.input_path` is read when `None`.
    pub text: Option<String>,
    /// Return the XML instead of writing `io.output_path`.
    pub to_stdout: bool,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// XML written to a file.
    Written { path: PathBuf, bytes: usize },
    /// XML to be printed by the caller.
    Printed(String),
}

/// Validate `config`, logging the problems before returning them.
///
/// Call after logging is initialized so a rejected configuration also lands
/// in the log file.
pub fn preflight(config: &AppConfig) -> ConfigResult<()> {
    ConfigValidator::validate(config).inspect_err(|err| {
        tracing::error!(errors = err.count(), error = %err, "Invalid configuration");
    })
}

/// Run one conversion as configured.
///
/// An existing output file is replaced only after the whole document has been
/// produced and written next to it.
pub async fn run(config: &AppConfig, input: RunInput) -> ConvertResult<RunOutcome> {
    let text = match input.text {
        Some(text) => text,
        None => read_input(&config.io.input_path).await?,
    };

    let clauses = validate_schedule_text(&text).inspect_err(|e| {
        tracing::error!(error = %e, "Schedule text rejected");
    })?;
    tracing::info!(clauses = clauses.len(), "Schedule text accepted");

    let converter = ScheduleConverter::from_config(&config.backend)?;
    let xml = converter.convert(text.trim()).await?;

    if input.to_stdout {
        return Ok(RunOutcome::Printed(xml));
    }

    let path = config.io.output_path.clone();
    let timer = OpTimer::new("app", "write");
    let written = write_atomically(&path, &xml);
    timer.finish_with_result(written.as_ref());
    written?;

    tracing::info!(path = %path.display(), "AIXM XML written");
    Ok(RunOutcome::Written {
        path,
        bytes: xml.len(),
    })
}

async fn read_input(path: &Path) -> ConvertResult<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Failed to read schedule text");
        ConvertError::io(path, e)
    })
}

/// Write `contents` to a temporary file beside `path`, then rename it over `path`.
fn write_atomically(path: &Path, contents: &str) -> ConvertResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| ConvertError::io(dir, e))?;
    file.write_all(contents.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| ConvertError::io(file.path(), e))?;
    file.persist(path)
        .map_err(|e| ConvertError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendKind;
    use crate::config::ConfigurationError;
    use std::sync::Mutex;

    fn rules_config(dir: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.backend.kind = BackendKind::Rules;
        config.io.input_path = dir.join("schedule.txt");
        config.io.output_path = dir.join("aixm_output.xml");
        config
    }

    #[tokio::test]
    async fn test_run_reads_file_and_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = rules_config(dir.path());
        std::fs::write(&config.io.input_path, "MON-FRI: 0800-1800, SAT: 0800-1200\n").unwrap();

        let outcome = run(&config, RunInput::default()).await.unwrap();

        let written = std::fs::read_to_string(&config.io.output_path).unwrap();
        assert_eq!(
            outcome,
            RunOutcome::Written {
                path: config.io.output_path.clone(),
                bytes: written.len()
            }
        );
        assert!(written.contains("<day>WORK DAY</day>"));
        assert!(written.contains("<endTime>12:00</endTime>"));
    }

    #[tokio::test]
    async fn test_run_inline_text_to_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let config = rules_config(dir.path());
        let input = RunInput {
            text: Some("SUN-SAT: 0000-2359".to_string()),
            to_stdout: true,
        };

        match run(&config, input).await.unwrap() {
            RunOutcome::Printed(xml) => assert!(xml.contains("<day>EVERY DAY</day>")),
            other => panic!("expected printed output, got {other:?}"),
        }
        assert!(!config.io.output_path.exists());
    }

    #[tokio::test]
    async fn test_missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = rules_config(dir.path());

        let err = run(&config, RunInput::default()).await.unwrap_err();
        assert_eq!(err.stage(), "io");
    }

    #[tokio::test]
    async fn test_rejected_input_keeps_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = rules_config(dir.path());
        std::fs::write(&config.io.output_path, "previous").unwrap();

        let input = RunInput {
            text: Some("Weekdays 8 to 6".to_string()),
            to_stdout: false,
        };
        let err = run(&config, input).await.unwrap_err();

        assert!(matches!(err, ConvertError::InputFormat(_)));
        assert_eq!(std::fs::read_to_string(&config.io.output_path).unwrap(), "previous");
    }

    #[test]
    fn test_preflight_logs_rejected_config() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("app.log");
        let file = std::fs::File::create(&log_path).unwrap();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .finish();

        let mut config = rules_config(dir.path());
        config.backend.kind = BackendKind::Gemini;
        let result = tracing::subscriber::with_default(subscriber, || preflight(&config));

        assert!(matches!(
            result,
            Err(ConfigurationError::MissingRequired { .. })
        ));
        let log = std::fs::read_to_string(&log_path).unwrap();
        assert!(log.contains("Invalid configuration"));
        assert!(log.contains("errors=1"));
        assert!(log.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_preflight_accepts_offline_backend() {
        let dir = tempfile::tempdir().unwrap();
        assert!(preflight(&rules_config(dir.path())).is_ok());
    }

    #[test]
    fn test_write_atomically_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xml");
        std::fs::write(&path, "old").unwrap();

        write_atomically(&path, "<PropertiesWithSchedule/>").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<PropertiesWithSchedule/>");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
