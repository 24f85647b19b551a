//! Schedule data model.
//!
//! A [`ScheduleRecord`] is one operating period of an AIXM `Timesheet`. The
//! six keys it carries are enumerated by [`Field`], which also fixes the order
//! in which they are rendered and the values substituted when a key is absent.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Time reference of a timesheet. Only UTC is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeReference {
    /// Coordinated Universal Time.
    #[default]
    #[serde(rename = "UTC")]
    Utc,
}

impl TimeReference {
    /// The AIXM code for this time reference.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utc => "UTC",
        }
    }

    /// Parse an AIXM time reference code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "UTC" => Some(Self::Utc),
            _ => None,
        }
    }
}

impl fmt::Display for TimeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The keys of a schedule record, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// `timeReference`
    TimeReference,
    /// `startDate`
    StartDate,
    /// `endDate`
    EndDate,
    /// `day`
    Day,
    /// `startTime`
    StartTime,
    /// `endTime`
    EndTime,
}

impl Field {
    /// All fields in the order they appear inside a `Timesheet`.
    pub const ALL: [Field; 6] = [
        Field::TimeReference,
        Field::StartDate,
        Field::EndDate,
        Field::Day,
        Field::StartTime,
        Field::EndTime,
    ];

    /// JSON key and XML element name.
    pub fn key(&self) -> &'static str {
        match self {
            Self::TimeReference => "timeReference",
            Self::StartDate => "startDate",
            Self::EndDate => "endDate",
            Self::Day => "day",
            Self::StartTime => "startTime",
            Self::EndTime => "endTime",
        }
    }

    /// Value written by the renderer when the field is absent.
    pub fn default_value(&self) -> &'static str {
        match self {
            Self::TimeReference => "UTC",
            Self::StartDate => WHOLE_YEAR_START,
            Self::EndDate => WHOLE_YEAR_END,
            Self::Day => EVERY_DAY,
            Self::StartTime => "00:00",
            Self::EndTime => "23:59",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// First day of the yearly date range (`DD-MM`).
pub const WHOLE_YEAR_START: &str = "01-01";
/// Last day of the yearly date range (`DD-MM`).
pub const WHOLE_YEAR_END: &str = "31-12";
/// Day group covering Monday to Friday.
pub const WORK_DAY: &str = "WORK DAY";
/// Day group covering the whole week.
pub const EVERY_DAY: &str = "EVERY DAY";

/// One validated operating period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecord {
    /// Time reference of the start/end times.
    pub time_reference: TimeReference,
    /// First day of the period, `DD-MM`.
    pub start_date: String,
    /// Last day of the period, `DD-MM`.
    pub end_date: String,
    /// Day or day-group token (`MON`, `WORK DAY`, `EVERY DAY`, ...).
    pub day: String,
    /// Opening time, `HH:MM`.
    pub start_time: String,
    /// Closing time, `HH:MM`.
    pub end_time: String,
}

impl ScheduleRecord {
    /// A UTC record covering the whole year.
    pub fn whole_year(
        day: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            time_reference: TimeReference::Utc,
            start_date: WHOLE_YEAR_START.to_string(),
            end_date: WHOLE_YEAR_END.to_string(),
            day: day.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    /// Value of `field` as text.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::TimeReference => self.time_reference.as_str(),
            Field::StartDate => &self.start_date,
            Field::EndDate => &self.end_date,
            Field::Day => &self.day,
            Field::StartTime => &self.start_time,
            Field::EndTime => &self.end_time,
        }
    }
}
