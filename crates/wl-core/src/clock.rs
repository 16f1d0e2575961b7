//! Wall-clock times and calendar dates as persisted in session records.
//!
//! Times are `HH:MM` strings in 24-hour form with no timezone. `24:00` is a
//! valid end-of-day marker, so a time is stored as minutes since midnight in
//! `0..=1440` rather than as a `chrono::NaiveTime`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

/// Minutes in a day; the largest valid [`WallTime`].
pub const MINUTES_PER_DAY: u16 = 1440;

static WALL_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{2}):([0-9]{2})$").unwrap());

/// A wall-clock time of day, `00:00` through `24:00` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WallTime(u16);

impl WallTime {
    /// End of day (`24:00`).
    pub const END_OF_DAY: Self = Self(MINUTES_PER_DAY);

    /// Parses an `HH:MM` string.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let format_err = || ValidationError::InvalidTimeFormat {
            value: value.to_string(),
        };
        let caps = WALL_TIME_RE.captures(value).ok_or_else(format_err)?;
        let hours: u16 = caps[1].parse().map_err(|_| format_err())?;
        let minutes: u16 = caps[2].parse().map_err(|_| format_err())?;

        let total = hours * 60 + minutes;
        if minutes >= 60 || total > MINUTES_PER_DAY {
            return Err(ValidationError::TimeOutOfRange {
                value: value.to_string(),
            });
        }
        Ok(Self(total))
    }

    /// Builds a time from minutes since midnight.
    pub fn from_minutes(minutes: u16) -> Result<Self, ValidationError> {
        if minutes > MINUTES_PER_DAY {
            return Err(ValidationError::TimeOutOfRange {
                value: format!("{minutes} minutes"),
            });
        }
        Ok(Self(minutes))
    }

    /// Truncates a `NaiveTime` to the minute.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "hour and minute of a NaiveTime always fit in u16"
    )]
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }

    /// Minutes since midnight.
    #[must_use]
    pub const fn minutes(self) -> u16 {
        self.0
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for WallTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WallTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WallTime> for String {
    fn from(time: WallTime) -> Self {
        time.to_string()
    }
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        value: value.to_string(),
    })
}

/// Formats a date the way it is persisted.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
