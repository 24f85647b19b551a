//! AIXM Timesheet - Main Entry Point
//!
//! Reads a schedule line, converts it and writes the AIXM XML.

use std::path::PathBuf;

use clap::Parser;

use aixm_timesheet::backend::BackendKind;
use aixm_timesheet::config::{AppConfig, ConfigValidator, ConfigurationError};
use aixm_timesheet::logging::init_tracing;
use aixm_timesheet::{RunInput, RunOutcome, preflight, run};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "aixm-timesheet")]
#[command(about = "Convert free-text operating schedules into AIXM 5.1.1 Timesheet XML")]
#[command(version)]
struct Args {
    /// Config file path.
    #[arg(short, long, env = "AIXM_CONFIG")]
    config: Option<PathBuf>,

    /// File holding the schedule text.
    #[arg(short, long, env = "AIXM_INPUT")]
    input: Option<PathBuf>,

    /// File receiving the XML.
    #[arg(short, long, env = "AIXM_OUTPUT")]
    output: Option<PathBuf>,

    /// Backend: gemini, rules or mock.
    #[arg(short, long, env = "AIXM_BACKEND")]
    backend: Option<BackendKind>,

    /// Schedule text given inline instead of reading the input file.
    #[arg(short, long)]
    text: Option<String>,

    /// Print the XML to stdout instead of writing the output file.
    #[arg(long)]
    stdout: bool,

    /// Log level.
    #[arg(long, env = "AIXM_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(input) = &self.input {
            config.io.input_path.clone_from(input);
        }
        if let Some(output) = &self.output {
            config.io.output_path.clone_from(output);
        }
        if let Some(kind) = self.backend {
            config.backend.kind = kind;
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load_unchecked(args.config.as_deref())?;
    args.apply(&mut config);

    if let Some(err) = ConfigurationError::from_list(ConfigValidator::validate_logging(&config.logging)) {
        return Err(err.into());
    }
    init_tracing(&config.logging)?;

    preflight(&config)?;

    tracing::info!(
        backend = %config.backend.kind,
        "Starting AIXM Timesheet v{}",
        env!("CARGO_PKG_VERSION")
    );

    let input = RunInput {
        text: args.text,
        to_stdout: args.stdout,
    };

    match run(&config, input).await {
        Ok(RunOutcome::Printed(xml)) => println!("{xml}"),
        Ok(RunOutcome::Written { path, bytes }) => {
            tracing::info!(path = %path.display(), bytes, "Conversion finished");
        }
        Err(e) => {
            tracing::error!(stage = e.stage(), error = %e, "Conversion failed");
            return Err(e.into());
        }
    }

    Ok(())
}
