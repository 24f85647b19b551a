//! AIXM 5.1.1 `PropertiesWithSchedule` renderer.
//!
//! Output layout, two-space indented, without an XML declaration:
//!
//! ```text
//! <PropertiesWithSchedule>
//!   <timeInterval>
//!     <Timesheet>
//!       <timeReference>UTC</timeReference>
//!       <startDate>01-01</startDate>
//!       <endDate>31-12</endDate>
//!       <day>WORK DAY</day>
//!       <startTime>08:00</startTime>
//!       <endTime>18:00</endTime>
//!     </Timesheet>
//!   </timeInterval>
//! </PropertiesWithSchedule>
//! ```
//!
//! Absent fields are written with their [`Field::default_value`], so records
//! that never went through the strict parser still render. Supported record
//! sources are [`ScheduleRecord`], JSON objects (`serde_json::Value` and
//! `Map`), and plain `HashMap<String, String>` key/value records.

use std::borrow::Cow;
use std::collections::HashMap;

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use serde_json::{Map, Value};

use crate::error::RenderError;
use crate::model::{Field, ScheduleRecord};
use crate::parser::json_type;

const ROOT: &str = "PropertiesWithSchedule";
const TIME_INTERVAL: &str = "timeInterval";
const TIMESHEET: &str = "Timesheet";
const INDENT: usize = 2;

/// Why a record could not provide a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceError {
    /// The record is not a key/value mapping.
    NotAMapping,
    /// The field is present but not text.
    NotText { found: &'static str },
}

/// Anything that can be rendered as one `Timesheet`.
pub trait TimesheetSource {
    /// Text of `field`, or `Ok(None)` when the record does not carry it.
    fn field(&self, field: Field) -> Result<Option<&str>, SourceError>;
}

impl TimesheetSource for ScheduleRecord {
    fn field(&self, field: Field) -> Result<Option<&str>, SourceError> {
        Ok(Some(self.get(field)))
    }
}

impl TimesheetSource for Map<String, Value> {
    fn field(&self, field: Field) -> Result<Option<&str>, SourceError> {
        match self.get(field.key()) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(SourceError::NotText {
                found: json_type(other),
            }),
        }
    }
}

impl TimesheetSource for Value {
    fn field(&self, field: Field) -> Result<Option<&str>, SourceError> {
        match self {
            Value::Object(map) => map.field(field),
            _ => Err(SourceError::NotAMapping),
        }
    }
}

impl TimesheetSource for HashMap<String, String> {
    fn field(&self, field: Field) -> Result<Option<&str>, SourceError> {
        Ok(self.get(field.key()).map(String::as_str))
    }
}

/// Render `records` as an indented `PropertiesWithSchedule` document.
///
/// One `timeInterval` per record, in input order. Rendering the same records
/// twice yields identical output.
pub fn render<S: TimesheetSource>(records: &[S]) -> Result<String, RenderError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);

    if records.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(ROOT)))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new(ROOT)))?;
        for (index, record) in records.iter().enumerate() {
            write_interval(&mut writer, index, record).inspect_err(|e| {
                tracing::error!(index, error = %e, "Failed to render timesheet");
            })?;
        }
        writer.write_event(Event::End(BytesEnd::new(ROOT)))?;
    }

    String::from_utf8(writer.into_inner()).map_err(|e| RenderError::Xml(e.to_string()))
}

fn write_interval<S: TimesheetSource>(
    writer: &mut Writer<Vec<u8>>,
    index: usize,
    record: &S,
) -> Result<(), RenderError> {
    // Resolve every value first so a bad record fails before any of it is written.
    let values = Field::ALL
        .into_iter()
        .map(|field| resolve(index, record, field).map(|value| (field, value)))
        .collect::<Result<Vec<_>, _>>()?;

    writer.write_event(Event::Start(BytesStart::new(TIME_INTERVAL)))?;
    writer.write_event(Event::Start(BytesStart::new(TIMESHEET)))?;
    for (field, value) in values {
        if value.is_empty() {
            writer.write_event(Event::Empty(BytesStart::new(field.key())))?;
        } else {
            writer.write_event(Event::Start(BytesStart::new(field.key())))?;
            writer.write_event(Event::Text(BytesText::from_escaped(value)))?;
            writer.write_event(Event::End(BytesEnd::new(field.key())))?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new(TIMESHEET)))?;
    writer.write_event(Event::End(BytesEnd::new(TIME_INTERVAL)))?;
    Ok(())
}

/// Escaped text for `field`, defaulted when absent.
fn resolve<'a, S: TimesheetSource>(
    index: usize,
    record: &'a S,
    field: Field,
) -> Result<Cow<'a, str>, RenderError> {
    let raw = match record.field(field) {
        Ok(Some(value)) => value,
        Ok(None) => field.default_value(),
        Err(SourceError::NotAMapping) => return Err(RenderError::NotAMapping { index }),
        Err(SourceError::NotText { found }) => {
            return Err(RenderError::InvalidValue {
                index,
                field,
                reason: format!("expected text, found {found}"),
            });
        }
    };

    if let Some(c) = raw.chars().find(|c| !is_xml_char(*c)) {
        return Err(RenderError::InvalidValue {
            index,
            field,
            reason: format!("character U+{:04X} is not allowed in XML", u32::from(c)),
        });
    }

    // Quotes stay as written; only `&`, `<` and `>` are escaped in text.
    let escaped = partial_escape(raw);
    if escaped.contains(['\n', '\r']) {
        // Keep each element on one line.
        Ok(Cow::Owned(
            escaped.replace('\n', "&#10;").replace('\r', "&#13;"),
        ))
    } else {
        Ok(escaped)
    }
}

/// XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..)
}
