//! Text-to-schedule parser.
//!
//! Sends the schedule text to a [`ScheduleBackend`] and validates the JSON
//! payload it returns. The backend is untrusted: every structural problem is
//! reported as a specific [`ParseError`] and no partial list is ever returned.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::backend::ScheduleBackend;
use crate::error::ParseError;
use crate::model::{Field, ScheduleRecord, TimeReference};

/// Parser bound to one backend.
#[derive(Debug, Clone)]
pub struct ScheduleParser {
    backend: Arc<dyn ScheduleBackend>,
}

impl ScheduleParser {
    /// Create a parser over `backend`.
    pub fn new(backend: Arc<dyn ScheduleBackend>) -> Self {
        Self { backend }
    }

    /// The backend this parser queries.
    pub fn backend(&self) -> &Arc<dyn ScheduleBackend> {
        &self.backend
    }

    /// Parse `text` into validated schedule records.
    #[tracing::instrument(skip_all, fields(backend = %self.backend.kind()))]
    pub async fn parse(&self, text: &str) -> Result<Vec<ScheduleRecord>, ParseError> {
        if text.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let payload = self.backend.extract(text).await.inspect_err(|e| {
            tracing::error!(error = %e, "Backend call failed");
        })?;

        parse_payload(&payload).inspect_err(|e| {
            tracing::error!(error = %e, "Rejected backend payload");
        })
    }
}

/// Validate a backend payload and build the records it describes.
///
/// Beyond key presence, the record invariants are enforced here: non-blank
/// string values, `timeReference` of exactly `UTC`, and a non-empty list.
pub fn parse_payload(payload: &str) -> Result<Vec<ScheduleRecord>, ParseError> {
    let value: Value = serde_json::from_str(payload)?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(ParseError::NotAList {
                found: json_type(&other),
            });
        }
    };

    // Check the shape of every element before building any record.
    let objects = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let object = item.as_object().ok_or(ParseError::NotAnObject {
                index,
                found: json_type(item),
            })?;
            let missing: Vec<Field> = Field::ALL
                .into_iter()
                .filter(|field| !object.contains_key(field.key()))
                .collect();
            if missing.is_empty() {
                Ok(object)
            } else {
                Err(ParseError::MissingKeys { index, missing })
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    if objects.is_empty() {
        return Err(ParseError::NoRecords);
    }

    let records = objects
        .into_iter()
        .enumerate()
        .map(|(index, object)| build_record(index, object))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(records = records.len(), "Backend payload accepted");
    Ok(records)
}

fn build_record(index: usize, object: &Map<String, Value>) -> Result<ScheduleRecord, ParseError> {
    let text = |field: Field| -> Result<String, ParseError> {
        let invalid = |reason: &str| ParseError::InvalidField {
            index,
            field,
            reason: reason.to_string(),
        };
        match object.get(field.key()) {
            Some(Value::String(s)) if s.trim().is_empty() => Err(invalid("value is blank")),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(invalid(&format!("expected a string, found {}", json_type(other)))),
            None => Err(invalid("value is missing")),
        }
    };

    let reference = text(Field::TimeReference)?;
    let time_reference =
        TimeReference::from_code(&reference).ok_or_else(|| ParseError::InvalidField {
            index,
            field: Field::TimeReference,
            reason: format!("unsupported time reference '{reference}'"),
        })?;

    Ok(ScheduleRecord {
        time_reference,
        start_date: text(Field::StartDate)?,
        end_date: text(Field::EndDate)?,
        day: text(Field::Day)?,
        start_time: text(Field::StartTime)?,
        end_time: text(Field::EndTime)?,
    })
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
