//! AIXM Timesheet - free-text schedules to AIXM 5.1.1 XML
//!
//! Converts operating-hours text such as `MON-FRI: 0800-1800, SAT: 0800-1200`
//! into the `PropertiesWithSchedule` fragment of AIXM 5.1.1:
//!
//! - **Parse**: a pluggable backend (Gemini, a deterministic rule engine, or a
//!   fixed mock) turns text into JSON schedule records, which are validated
//!   strictly before use
//! - **Render**: records become an indented `PropertiesWithSchedule` document,
//!   with defaults for absent fields
//!
//! # Architecture
//!
//! - [`config`]: configuration loading and validation
//! - [`validate`]: grammar check of the raw schedule text
//! - [`backend`]: text-understanding backends and their factory
//! - [`parser`]: backend call plus strict payload validation
//! - [`render`]: AIXM XML writer
//! - [`converter`]: the parse-then-render pipeline
//! - [`app`]: file/stdout runner used by the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use aixm_timesheet::{backend::RuleBackend, ScheduleConverter};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let converter = ScheduleConverter::new(Arc::new(RuleBackend));
//!     let xml = converter.convert("MON-FRI: 0800-1800, SAT: 0800-1200").await?;
//!     println!("{xml}");
//!     Ok(())
//! }
//! ```

#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod app;
pub mod backend;
pub mod config;
pub mod converter;
pub mod error;
pub mod logging;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod render;
pub mod validate;

pub use app::{RunInput, RunOutcome, preflight, run};
pub use config::AppConfig;
pub use converter::ScheduleConverter;
pub use error::{BackendError, ConvertError, ConvertResult, InputFormatError, ParseError, RenderError};
pub use model::{Field, ScheduleRecord, TimeReference};
pub use parser::{ScheduleParser, parse_payload};
pub use render::{TimesheetSource, render};
pub use validate::validate_schedule_text;
