//! Pre-validation of raw schedule text.
//!
//! Accepted input is a single line of comma-separated clauses of the form
//! `<DAY-TOKEN>: HHMM-HHMM`, for example `MON-FRI: 0800-1800, SAT: 0800-1200`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::InputFormatError;
use crate::model::{EVERY_DAY, WORK_DAY};

static CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(MON-FRI|SUN-FRI|MON-SAT|SUN-SAT|MON|TUE|WED|THU|FRI|SAT|SUN|Every day)[ \t]*:[ \t]*([0-9]{4})-([0-9]{4})$",
    )
    .expect("clause pattern is valid")
});

/// Day tokens accepted by the input grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayToken {
    MonFri,
    SunFri,
    MonSat,
    SunSat,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
    EveryDay,
}

impl DayToken {
    /// Parse a token exactly as written in the grammar.
    pub fn from_token(token: &str) -> Option<Self> {
        let day = match token {
            "MON-FRI" => Self::MonFri,
            "SUN-FRI" => Self::SunFri,
            "MON-SAT" => Self::MonSat,
            "SUN-SAT" => Self::SunSat,
            "MON" => Self::Mon,
            "TUE" => Self::Tue,
            "WED" => Self::Wed,
            "THU" => Self::Thu,
            "FRI" => Self::Fri,
            "SAT" => Self::Sat,
            "SUN" => Self::Sun,
            "Every day" => Self::EveryDay,
            _ => return None,
        };
        Some(day)
    }

    /// The token as it appears in input text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MonFri => "MON-FRI",
            Self::SunFri => "SUN-FRI",
            Self::MonSat => "MON-SAT",
            Self::SunSat => "SUN-SAT",
            Self::Mon => "MON",
            Self::Tue => "TUE",
            Self::Wed => "WED",
            Self::Thu => "THU",
            Self::Fri => "FRI",
            Self::Sat => "SAT",
            Self::Sun => "SUN",
            Self::EveryDay => "Every day",
        }
    }

    /// The AIXM `day` value this token maps to.
    ///
    /// Mon-Fri is the `WORK DAY` group and a full week is `EVERY DAY`. The
    /// other ranges have no named group and are kept as written.
    pub fn aixm_day(&self) -> &'static str {
        match self {
            Self::MonFri => WORK_DAY,
            Self::SunSat | Self::EveryDay => EVERY_DAY,
            other => other.as_str(),
        }
    }
}

impl fmt::Display for DayToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 24-hour clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl ClockTime {
    /// Parse four `HHMM` digits.
    fn from_hhmm(digits: &str) -> Option<Self> {
        let hour: u8 = digits.get(..2)?.parse().ok()?;
        let minute: u8 = digits.get(2..4)?.parse().ok()?;
        (hour <= 23 && minute <= 59).then_some(Self { hour, minute })
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// One validated `<DAY>: HHMM-HHMM` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clause {
    pub day: DayToken,
    pub start: ClockTime,
    pub end: ClockTime,
}

/// Check `text` against the schedule grammar and return its clauses in order.
pub fn validate_schedule_text(text: &str) -> Result<Vec<Clause>, InputFormatError> {
    let line = text.trim();
    if line.is_empty() {
        return Err(InputFormatError::Empty);
    }

    line.split(',').map(parse_clause).collect()
}

fn parse_clause(raw: &str) -> Result<Clause, InputFormatError> {
    let clause = raw.trim_matches([' ', '\t']);
    let malformed = || InputFormatError::Malformed {
        clause: clause.to_string(),
    };

    let caps = CLAUSE.captures(clause).ok_or_else(malformed)?;
    let day = DayToken::from_token(&caps[1]).ok_or_else(malformed)?;

    let time = |digits: &str| {
        ClockTime::from_hhmm(digits).ok_or_else(|| InputFormatError::TimeOutOfRange {
            clause: clause.to_string(),
            time: digits.to_string(),
        })
    };

    Ok(Clause {
        day,
        start: time(&caps[2])?,
        end: time(&caps[3])?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_reference_schedule() {
        let clauses = validate_schedule_text("MON-FRI: 0800-1800, SAT: 0800-1200").unwrap();

        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].day, DayToken::MonFri);
        assert_eq!(clauses[0].start.to_string(), "08:00");
        assert_eq!(clauses[0].end.to_string(), "18:00");
        assert_eq!(clauses[1].day, DayToken::Sat);
        assert_eq!(clauses[1].end.to_string(), "12:00");
    }

    #[test]
    fn test_accepts_every_day_and_loose_spacing() {
        let clauses = validate_schedule_text("  Every day :0900-1700 ,SUN:0000-2359\n").unwrap();
        assert_eq!(clauses[0].day, DayToken::EveryDay);
        assert_eq!(clauses[1].day, DayToken::Sun);
        assert_eq!(clauses[1].end.to_string(), "23:59");
    }

    #[test]
    fn test_rejects_empty_text() {
        assert_eq!(validate_schedule_text("   "), Err(InputFormatError::Empty));
    }

    #[test]
    fn test_rejects_unknown_day_token() {
        let err = validate_schedule_text("MON-FRI: 0800-1800, HOL: 0800-1200").unwrap_err();
        assert_eq!(
            err,
            InputFormatError::Malformed {
                clause: "HOL: 0800-1200".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_lowercase_and_missing_colon() {
        assert!(validate_schedule_text("mon: 0800-1800").is_err());
        assert!(validate_schedule_text("MON 0800-1800").is_err());
        assert!(validate_schedule_text("MON: 08:00-18:00").is_err());
        assert!(validate_schedule_text("MON: 0800-1800,").is_err());
    }

    #[test]
    fn test_rejects_multiple_lines() {
        assert!(validate_schedule_text("MON: 0800-1800\nTUE: 0800-1800").is_err());
    }

    #[test]
    fn test_rejects_out_of_range_times() {
        let err = validate_schedule_text("SAT: 2400-1200").unwrap_err();
        assert_eq!(
            err,
            InputFormatError::TimeOutOfRange {
                clause: "SAT: 2400-1200".to_string(),
                time: "2400".to_string()
            }
        );

        assert!(matches!(
            validate_schedule_text("SAT: 0800-1260"),
            Err(InputFormatError::TimeOutOfRange { .. })
        ));
    }

    #[test]
    fn test_day_group_mapping() {
        assert_eq!(DayToken::MonFri.aixm_day(), "WORK DAY");
        assert_eq!(DayToken::SunSat.aixm_day(), "EVERY DAY");
        assert_eq!(DayToken::EveryDay.aixm_day(), "EVERY DAY");
        assert_eq!(DayToken::SunFri.aixm_day(), "SUN-FRI");
        assert_eq!(DayToken::MonSat.aixm_day(), "MON-SAT");
        assert_eq!(DayToken::Wed.aixm_day(), "WED");
    }
}
