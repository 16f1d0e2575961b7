//! Display blocks for a day's timeline.
//!
//! Blocks are a one-to-one projection of raw sessions. They are never merged;
//! totals come from [`crate::merge_overlapping`] instead.

use serde::Serialize;

use crate::session::WorkSession;
use crate::types::SessionId;

/// Fixed palette that project names hash into.
pub const PROJECT_PALETTE: [&str; 8] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899", "#06b6d4", "#84cc16",
];

/// One raw session laid out on a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineBlock {
    pub session_id: SessionId,
    /// Minutes since midnight.
    pub start: u16,
    /// Minutes since midnight.
    pub end: u16,
    pub duration: i32,
    pub color: &'static str,
    pub description: String,
    pub project: String,
    pub category: String,
}

/// Projects sessions into blocks ordered by start time.
///
/// Sessions with the same start keep their input order.
pub fn to_timeline_blocks(sessions: &[WorkSession]) -> Vec<TimelineBlock> {
    let mut sorted: Vec<&WorkSession> = sessions.iter().collect();
    sorted.sort_by_key(|session| session.start_time);

    sorted
        .into_iter()
        .map(|session| TimelineBlock {
            session_id: session.id.clone(),
            start: session.start_time.minutes(),
            end: session.end_time.minutes(),
            duration: session.duration_minutes(),
            color: project_color(&session.project),
            description: session.description.clone(),
            project: session.project.clone(),
            category: session.category.clone(),
        })
        .collect()
}

/// Deterministic palette color for a project name.
///
/// Rolling hash `acc * 31 + unit` over UTF-16 code units with 32-bit signed
/// wrap-around, then `|acc| mod 8`.
pub fn project_color(project: &str) -> &'static str {
    PROJECT_PALETTE[project_color_index(project)]
}

fn project_color_index(project: &str) -> usize {
    let hash = project
        .encode_utf16()
        .fold(0_i32, |acc, unit| acc.wrapping_mul(31).wrapping_add(i32::from(unit)));
    hash.unsigned_abs() as usize % PROJECT_PALETTE.len()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::clock::WallTime;
    use crate::types::StaffId;

    fn session(id: &str, start: &str, end: &str, project: &str) -> WorkSession {
        WorkSession::new(
            SessionId::new(id).unwrap(),
            StaffId::new("alice").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            WallTime::parse(start).unwrap(),
            WallTime::parse(end).unwrap(),
        )
        .unwrap()
        .with_project(project)
    }

    #[test]
    fn hash_matches_known_values() {
        // "A" = 65 -> 65 % 8 = 1
        assert_eq!(project_color_index("A"), 1);
        // "ab" = 97 * 31 + 98 = 3105 -> 3105 % 8 = 1
        assert_eq!(project_color_index("ab"), 1);
        assert_eq!(project_color_index(""), 0);
        assert_eq!(project_color(""), PROJECT_PALETTE[0]);
    }

    #[test]
    fn hash_wraps_on_long_names() {
        let long = "a-very-long-project-name-that-overflows-32-bits".repeat(4);
        assert_eq!(project_color(&long), project_color(&long));
        assert!(project_color_index(&long) < PROJECT_PALETTE.len());
    }

    #[test]
    fn blocks_are_not_merged() {
        let sessions = vec![
            session("b", "10:00", "11:00", "crm"),
            session("a", "09:00", "10:30", "website"),
        ];
        let blocks = to_timeline_blocks(&sessions);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].session_id.as_str(), "a");
        assert_eq!((blocks[0].start, blocks[0].end, blocks[0].duration), (540, 630, 90));
        assert_eq!(blocks[1].session_id.as_str(), "b");
    }

    #[test]
    fn same_project_same_color() {
        let sessions = vec![
            session("a", "09:00", "10:00", "website"),
            session("b", "11:00", "12:00", "website"),
            session("c", "13:00", "14:00", "crm"),
        ];
        let first = to_timeline_blocks(&sessions);
        let second = to_timeline_blocks(&sessions);

        assert_eq!(first[0].color, first[1].color);
        assert_eq!(first[2].color, project_color("crm"));
        assert_eq!(first, second);
    }
}
