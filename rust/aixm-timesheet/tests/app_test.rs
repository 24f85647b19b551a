use std::path::Path;

use aixm_timesheet::backend::BackendKind;
use aixm_timesheet::config::{AppConfig, ConfigurationError};
use aixm_timesheet::{ConvertError, RunInput, RunOutcome, run};

fn config_in(dir: &Path, kind: BackendKind) -> AppConfig {
    let mut config = AppConfig::default();
    config.backend.kind = kind;
    config.io.input_path = dir.join("schedule.txt");
    config.io.output_path = dir.join("aixm_output.xml");
    config
}

#[tokio::test]
async fn test_mock_run_writes_reference_document() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), BackendKind::Mock);
    std::fs::write(&config.io.input_path, "MON-FRI: 0800-1800, SAT: 0800-1200").unwrap();

    let outcome = run(&config, RunInput::default()).await.unwrap();
    assert!(matches!(outcome, RunOutcome::Written { .. }));

    let xml = std::fs::read_to_string(&config.io.output_path).unwrap();
    assert!(xml.starts_with("<PropertiesWithSchedule>\n  <timeInterval>"));
    assert!(xml.ends_with("</PropertiesWithSchedule>"));
    assert_eq!(xml.matches("<timeInterval>").count(), 2);
}

#[tokio::test]
async fn test_gemini_without_key_fails_before_touching_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), BackendKind::Gemini);
    std::fs::write(&config.io.output_path, "previous").unwrap();

    let input = RunInput {
        text: Some("SAT: 0800-1200".to_string()),
        to_stdout: false,
    };
    let err = run(&config, input).await.unwrap_err();

    assert!(matches!(
        err,
        ConvertError::Config(ConfigurationError::MissingRequired { .. })
    ));
    assert_eq!(std::fs::read_to_string(&config.io.output_path).unwrap(), "previous");
}

#[tokio::test]
async fn test_out_of_range_time_is_rejected_before_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), BackendKind::Mock);
    let input = RunInput {
        text: Some("MON-FRI: 0800-2500".to_string()),
        to_stdout: false,
    };

    let err = run(&config, input).await.unwrap_err();

    assert_eq!(err.stage(), "validate");
    assert!(err.to_string().contains("2500"));
    assert!(!config.io.output_path.exists());
}
