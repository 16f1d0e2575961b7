//! Per-day rollup of a staff member's sessions.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::{MergeConfig, MergedSession, earnings, merge_overlapping, total_minutes};
use crate::session::WorkSession;
use crate::timeline::{TimelineBlock, project_color, to_timeline_blocks};

/// Raw minutes logged against one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectTotal {
    pub project: String,
    pub color: &'static str,
    pub minutes: i64,
}

/// Everything a timeline view needs for one day.
#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub blocks: Vec<TimelineBlock>,
    pub merged: Vec<MergedSession>,
    pub total_minutes: i64,
    pub total_hours: f64,
    pub earnings: f64,
    pub by_project: Vec<ProjectTotal>,
}

impl DaySummary {
    /// Builds the summary from the day's sessions.
    ///
    /// Sessions dated on other days are ignored.
    #[expect(
        clippy::cast_precision_loss,
        reason = "minute totals are far below 2^52"
    )]
    pub fn build(
        date: NaiveDate,
        sessions: &[WorkSession],
        hourly_rate: f64,
        config: &MergeConfig,
    ) -> Self {
        let day: Vec<WorkSession> = sessions
            .iter()
            .filter(|session| session.date == date)
            .cloned()
            .collect();

        let minutes = total_minutes(&day, config);
        Self {
            date,
            blocks: to_timeline_blocks(&day),
            merged: merge_overlapping(&day, config),
            total_minutes: minutes,
            total_hours: minutes as f64 / 60.0,
            earnings: earnings(&day, hourly_rate, config),
            by_project: project_totals(&day),
        }
    }
}

/// Raw (unmerged) minutes per project, largest first, then by name.
///
/// Overlapping sessions on different projects each count in full.
pub fn project_totals(sessions: &[WorkSession]) -> Vec<ProjectTotal> {
    let mut minutes: HashMap<&str, i64> = HashMap::new();
    for session in sessions {
        *minutes.entry(session.project.as_str()).or_insert(0) +=
            i64::from(session.duration_minutes());
    }

    let mut totals: Vec<ProjectTotal> = minutes
        .into_iter()
        .map(|(project, minutes)| ProjectTotal {
            project: project.to_string(),
            color: project_color(project),
            minutes,
        })
        .collect();
    totals.sort_by(|a, b| b.minutes.cmp(&a.minutes).then_with(|| a.project.cmp(&b.project)));
    totals
}
