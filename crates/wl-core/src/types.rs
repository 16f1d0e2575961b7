//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A wall-clock time did not match `HH:MM`.
    #[error("invalid time '{value}': expected HH:MM")]
    InvalidTimeFormat { value: String },

    /// A wall-clock time was outside 00:00..=24:00.
    #[error("time out of range: {value} (must be between 00:00 and 24:00)")]
    TimeOutOfRange { value: String },

    /// The start of an interval was not strictly before its end.
    #[error("start time {start} must be before end time {end}")]
    InvertedInterval { start: String, end: String },

    /// A calendar date did not match `YYYY-MM-DD`.
    #[error("invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// The hourly rate was negative or not finite.
    #[error("hourly rate must be a non-negative finite number, got {value}")]
    InvalidHourlyRate { value: f64 },

    /// The category name exceeded the length limit.
    #[error("category must be at most {max} characters, got {len}")]
    CategoryTooLong { len: usize, max: usize },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated work session identifier.
    ///
    /// Generated sessions use UUID v4 strings; imported sessions may carry
    /// any non-empty identifier.
    SessionId, "session ID"
);

define_string_id!(
    /// A validated staff member identifier.
    ///
    /// Only used as a grouping key for sessions and timers.
    StaffId, "staff ID"
);

/// An hourly pay rate.
///
/// Always finite and non-negative. `earnings` trusts whatever rate it is
/// handed, so this is where the check lives.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct HourlyRate(f64);

impl HourlyRate {
    /// Creates a rate after validation.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::InvalidHourlyRate { value });
        }
        Ok(Self(value))
    }

    /// Returns the inner f64 value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for HourlyRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<f64> for HourlyRate {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HourlyRate> for f64 {
    fn from(rate: HourlyRate) -> Self {
        rate.0
    }
}

impl Serialize for HourlyRate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for HourlyRate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_rejects_empty() {
        assert!(SessionId::new("").is_err());
        assert!(SessionId::new("   ").is_err());
        assert!(SessionId::new("valid-session").is_ok());
    }

    #[test]
    fn staff_id_rejects_empty() {
        let err = StaffId::new("").unwrap_err();
        assert_eq!(err.to_string(), "staff ID cannot be empty");
        assert!(StaffId::new("alice").is_ok());
    }

    #[test]
    fn session_id_serde_roundtrip() {
        let id = SessionId::new("session-abc").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"session-abc\"");
        let parsed: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn staff_id_serde_rejects_empty() {
        let result: Result<StaffId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn staff_id_as_ref() {
        let id = StaffId::new("bob").unwrap();
        let s: &str = id.as_ref();
        assert_eq!(s, "bob");
    }

    // ========== HourlyRate Tests ==========

    #[test]
    fn hourly_rate_validates_range() {
        assert!(HourlyRate::new(0.0).is_ok());
        assert!(HourlyRate::new(42.5).is_ok());
        assert!(HourlyRate::new(-0.01).is_err());
        assert!(HourlyRate::new(f64::NAN).is_err());
        assert!(HourlyRate::new(f64::INFINITY).is_err());
    }

    #[test]
    fn hourly_rate_display_uses_two_decimals() {
        assert_eq!(HourlyRate::new(50.0).unwrap().to_string(), "50.00");
    }

    #[test]
    fn hourly_rate_serde_rejects_negative() {
        let parsed: HourlyRate = serde_json::from_str("35.5").unwrap();
        assert!((parsed.value() - 35.5).abs() < f64::EPSILON);

        let result: Result<HourlyRate, _> = serde_json::from_str("-1.0");
        assert!(result.is_err());
    }
}
