//! Work sessions: one staff member working on one thing for a span of a day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::WallTime;
use crate::types::{SessionId, StaffId, ValidationError};

/// A recorded span of work.
///
/// Both times fall on `date`, and `start_time < end_time` holds for every
/// session built by [`WorkSession::new`] or deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionFields")]
pub struct WorkSession {
    pub id: SessionId,
    pub staff_id: StaffId,
    pub date: NaiveDate,
    pub start_time: WallTime,
    pub end_time: WallTime,
    pub description: String,
    pub project: String,
    pub category: String,
}

/// Unchecked wire form of [`WorkSession`].
#[derive(Deserialize)]
struct SessionFields {
    id: SessionId,
    staff_id: StaffId,
    date: NaiveDate,
    start_time: WallTime,
    end_time: WallTime,
    #[serde(default)]
    description: String,
    #[serde(default)]
    project: String,
    #[serde(default)]
    category: String,
}

impl TryFrom<SessionFields> for WorkSession {
    type Error = ValidationError;

    fn try_from(fields: SessionFields) -> Result<Self, Self::Error> {
        Ok(
            Self::new(fields.id, fields.staff_id, fields.date, fields.start_time, fields.end_time)?
                .with_description(fields.description)
                .with_project(fields.project)
                .with_category(fields.category),
        )
    }
}

impl WorkSession {
    /// Creates a session after checking the interval.
    pub fn new(
        id: SessionId,
        staff_id: StaffId,
        date: NaiveDate,
        start_time: WallTime,
        end_time: WallTime,
    ) -> Result<Self, ValidationError> {
        check_interval(start_time, end_time)?;
        Ok(Self {
            id,
            staff_id,
            date,
            start_time,
            end_time,
            description: String::new(),
            project: String::new(),
            category: String::new(),
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Re-checks the interval, e.g. after an in-place edit.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_interval(self.start_time, self.end_time)
    }

    /// Length in minutes. Negative only if the interval invariant was bypassed.
    #[must_use]
    pub fn duration_minutes(&self) -> i32 {
        i32::from(self.end_time.minutes()) - i32::from(self.start_time.minutes())
    }
}

/// Rejects intervals whose start is not strictly before their end.
///
/// Range checks already happened when the [`WallTime`]s were parsed.
pub fn check_interval(start: WallTime, end: WallTime) -> Result<(), ValidationError> {
    if start >= end {
        return Err(ValidationError::InvertedInterval {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(())
}
