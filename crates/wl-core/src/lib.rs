//! Core domain logic for the work log.
//!
//! This crate contains the fundamental types and logic for:
//! - Wall-clock parsing: `HH:MM` session times and `YYYY-MM-DD` dates
//! - Aggregation: merging a day's sessions and deriving hours and earnings
//! - Timeline: per-session display blocks with stable project colors

mod aggregate;
pub mod category;
pub mod clock;
pub mod session;
pub mod summary;
pub mod timeline;
pub mod types;

pub use aggregate::{
    MergeConfig, MergedSession, Span, earnings, merge_overlapping, raw_total_minutes,
    total_hours, total_minutes, validate_interval,
};
pub use category::Category;
pub use clock::WallTime;
pub use session::WorkSession;
pub use summary::DaySummary;
pub use timeline::{TimelineBlock, project_color, to_timeline_blocks};
pub use types::{HourlyRate, SessionId, StaffId, ValidationError};
