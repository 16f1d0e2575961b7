//! Work-session interval aggregation.
//!
//! Merges a day's sessions into non-overlapping spans and derives totals from
//! them.
//!
//! # Algorithm Summary
//!
//! 1. Sort sessions by start time (stable, so equal starts keep input order)
//! 2. Walk the sorted list, growing the current span while the next session
//!    starts no later than `current end + adjacency tolerance`
//! 3. Close the span at the first gap wider than the tolerance
//!
//! Totals and earnings are computed over the merged spans, so overlapping
//! sessions are never counted twice. Inputs are typed, so malformed times are
//! impossible here; inverted intervals are the caller's contract to avoid.

use serde::Serialize;

use crate::clock::WallTime;
use crate::session::{WorkSession, check_interval};
use crate::types::SessionId;

/// Configuration for session merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeConfig {
    /// Gap, in minutes, across which two sessions still count as continuous.
    /// Default: 15.
    pub adjacency_tolerance_minutes: u16,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            adjacency_tolerance_minutes: 15,
        }
    }
}

/// Anything with a time span that can take part in a merge.
///
/// Implemented for raw [`WorkSession`]s and for [`MergedSession`]s, so merged
/// output can be merged again.
pub trait Span {
    fn start(&self) -> WallTime;

    fn end(&self) -> WallTime;

    fn description(&self) -> &str;

    fn project(&self) -> &str;

    fn category(&self) -> &str;

    /// Sessions this span was built from.
    fn session_ids(&self) -> &[SessionId];
}

impl Span for WorkSession {
    fn start(&self) -> WallTime {
        self.start_time
    }

    fn end(&self) -> WallTime {
        self.end_time
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn project(&self) -> &str {
        &self.project
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn session_ids(&self) -> &[SessionId] {
        std::slice::from_ref(&self.id)
    }
}

/// A maximal span covering one or more sessions.
///
/// Project and category come from the earliest session; descriptions of all
/// contributing sessions are joined with `"; "`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedSession {
    pub start: WallTime,
    pub end: WallTime,
    pub description: String,
    pub project: String,
    pub category: String,
    pub session_ids: Vec<SessionId>,
}

impl MergedSession {
    fn from_span<S: Span + ?Sized>(span: &S) -> Self {
        Self {
            start: span.start(),
            end: span.end(),
            description: span.description().to_string(),
            project: span.project().to_string(),
            category: span.category().to_string(),
            session_ids: span.session_ids().to_vec(),
        }
    }

    fn absorb<S: Span + ?Sized>(&mut self, span: &S) {
        self.end = self.end.max(span.end());
        self.description.push_str("; ");
        self.description.push_str(span.description());
        self.session_ids.extend_from_slice(span.session_ids());
    }

    /// Length in minutes.
    #[must_use]
    pub fn duration_minutes(&self) -> i32 {
        span_minutes(self)
    }
}

impl Span for MergedSession {
    fn start(&self) -> WallTime {
        self.start
    }

    fn end(&self) -> WallTime {
        self.end
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn project(&self) -> &str {
        &self.project
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn session_ids(&self) -> &[SessionId] {
        &self.session_ids
    }
}

fn span_minutes<S: Span + ?Sized>(span: &S) -> i32 {
    i32::from(span.end().minutes()) - i32::from(span.start().minutes())
}

/// Merges overlapping and near-adjacent sessions.
///
/// A session is folded into the current span when its start is at most
/// `current end + adjacency_tolerance_minutes` (inclusive). The result is
/// sorted by start and no two spans lie within the tolerance of each other,
/// so merging the output again changes nothing.
pub fn merge_overlapping<S: Span>(sessions: &[S], config: &MergeConfig) -> Vec<MergedSession> {
    let mut sorted: Vec<&S> = sessions.iter().collect();
    sorted.sort_by_key(|session| session.start());

    let mut merged = Vec::with_capacity(sorted.len());
    let mut remaining = sorted.into_iter();
    let Some(first) = remaining.next() else {
        return merged;
    };

    let tolerance = u32::from(config.adjacency_tolerance_minutes);
    let mut current = MergedSession::from_span(first);
    for session in remaining {
        let reach = u32::from(current.end.minutes()) + tolerance;
        if u32::from(session.start().minutes()) <= reach {
            current.absorb(session);
        } else {
            let next = MergedSession::from_span(session);
            merged.push(std::mem::replace(&mut current, next));
        }
    }
    merged.push(current);
    merged
}

/// Sum of merged span lengths, in minutes.
pub fn total_minutes<S: Span>(sessions: &[S], config: &MergeConfig) -> i64 {
    merge_overlapping(sessions, config)
        .iter()
        .map(|span| i64::from(span.duration_minutes()))
        .sum()
}

/// Sum of raw session lengths, in minutes, without merging.
pub fn raw_total_minutes<S: Span>(sessions: &[S]) -> i64 {
    sessions.iter().map(|s| i64::from(span_minutes(s))).sum()
}

/// Merged working time in hours.
#[expect(
    clippy::cast_precision_loss,
    reason = "minute totals are far below 2^52"
)]
pub fn total_hours<S: Span>(sessions: &[S], config: &MergeConfig) -> f64 {
    total_minutes(sessions, config) as f64 / 60.0
}

/// Merged working time multiplied by `hourly_rate`.
///
/// The rate is not checked here; use [`crate::HourlyRate`] upstream.
pub fn earnings<S: Span>(sessions: &[S], hourly_rate: f64, config: &MergeConfig) -> f64 {
    total_hours(sessions, config) * hourly_rate
}

/// Whether `start`..`end` is an acceptable session interval.
///
/// Both must be `HH:MM` within `00:00..=24:00` and `start` strictly earlier.
pub fn validate_interval(start: &str, end: &str) -> bool {
    let (Ok(start), Ok(end)) = (WallTime::parse(start), WallTime::parse(end)) else {
        return false;
    };
    check_interval(start, end).is_ok()
}
