//! Error types for the conversion pipeline.
//!
//! Each stage has its own error kind so callers can tell a rejected input
//! apart from a misbehaving backend or a rendering failure. [`ConvertError`]
//! wraps all of them for the orchestrating code.

use std::path::PathBuf;

use thiserror::Error;

use crate::backend::BackendKind;
use crate::config::ConfigurationError;
use crate::model::Field;

/// Failures of the text-understanding backend itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The request could not be sent or the connection dropped.
    #[error("Network request failed: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// The request exceeded the configured timeout.
    #[error("Backend request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// The backend answered but produced no text.
    #[error("Backend returned no content")]
    EmptyResponse,

    /// The response envelope could not be decoded.
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    /// The backend refused to interpret the text.
    #[error("{backend} backend rejected the input: {reason}")]
    Rejected { backend: BackendKind, reason: String },
}

/// Failures while turning backend output into schedule records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The schedule text is blank.
    #[error("Schedule text is empty")]
    EmptyInput,

    /// The backend call failed.
    #[error("Backend call failed: {0}")]
    Backend(#[from] BackendError),

    /// The payload is not JSON.
    #[error("Failed to parse backend response as JSON: {0}")]
    InvalidJson(String),

    /// The payload is JSON but not an array.
    #[error("Expected a list of schedules, found {found}")]
    NotAList { found: &'static str },

    /// An array element is not an object.
    #[error("Schedule {index} is not an object (found {found})")]
    NotAnObject { index: usize, found: &'static str },

    /// An array element lacks required keys.
    #[error("Schedule {index} is missing keys: {}", join_fields(.missing))]
    MissingKeys { index: usize, missing: Vec<Field> },

    /// A required key holds an unusable value.
    #[error("Schedule {index} has an invalid '{field}': {reason}")]
    InvalidField {
        index: usize,
        field: Field,
        reason: String,
    },

    /// The backend produced an empty list for non-empty text.
    #[error("Backend returned no schedules")]
    NoRecords,
}

/// Failures while serializing records to AIXM XML.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A record is not a key/value mapping.
    #[error("Record {index} is not a mapping")]
    NotAMapping { index: usize },

    /// A present value cannot be written as XML text.
    #[error("Record {index} has an invalid '{field}': {reason}")]
    InvalidValue {
        index: usize,
        field: Field,
        reason: String,
    },

    /// The XML writer failed.
    #[error("XML serialization failed: {0}")]
    Xml(String),
}

/// Raw schedule text that does not follow the `DAY: HHMM-HHMM` grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputFormatError {
    /// Nothing to convert.
    #[error("Schedule text is empty")]
    Empty,

    /// A clause does not match `<DAY-TOKEN>: HHMM-HHMM`.
    #[error("Malformed schedule clause '{clause}': expected '<DAY>: HHMM-HHMM'")]
    Malformed { clause: String },

    /// Hour or minute outside the 24-hour clock.
    #[error("Time '{time}' in clause '{clause}' is out of range (hours 00-23, minutes 00-59)")]
    TimeOutOfRange { clause: String, time: String },
}

/// Any failure of a conversion run.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Invalid or incomplete configuration.
    #[error(transparent)]
    Config(#[from] ConfigurationError),

    /// Input rejected by pre-validation.
    #[error("Invalid schedule input: {0}")]
    InputFormat(#[from] InputFormatError),

    /// Parsing stage failure.
    #[error("Parsing failed: {0}")]
    Parse(#[from] ParseError),

    /// Rendering stage failure.
    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    /// Reading input or writing output failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for conversion runs.
pub type ConvertResult<T> = Result<T, ConvertError>;

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::InvalidJson(err.to_string())
    }
}

impl From<quick_xml::Error> for RenderError {
    fn from(err: quick_xml::Error) -> Self {
        RenderError::Xml(err.to_string())
    }
}

impl ConvertError {
    /// Create an I/O error bound to a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }

    /// Short name of the stage that failed, for logs.
    pub fn stage(&self) -> &'static str {
        match self {
            ConvertError::Config(_) => "config",
            ConvertError::InputFormat(_) => "validate",
            ConvertError::Parse(_) => "parse",
            ConvertError::Render(_) => "render",
            ConvertError::Io { .. } => "io",
        }
    }
}

fn join_fields(fields: &[Field]) -> String {
    let keys: Vec<&str> = fields.iter().map(Field::key).collect();
    format!("{{{}}}", keys.join(", "))
}
