//! Shared utilities for CLI commands.

use anyhow::{Context, Result, bail};
use chrono::{Duration, Local, NaiveDate};

use wl_core::clock::parse_date;
use wl_core::{Category, StaffId, WallTime};
use wl_db::Database;

use crate::Config;

/// Opens the configured database, creating its parent directory if needed.
pub fn open_database(config: &Config) -> Result<Database> {
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("failed to create database directory")?;
        }
    }
    Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))
}

/// Picks the staff member from `--staff`, falling back to `default_staff`.
pub fn resolve_staff(explicit: Option<&str>, config: &Config) -> Result<StaffId> {
    let Some(raw) = explicit.or(config.default_staff.as_deref()) else {
        bail!("no staff member given: pass --staff or set default_staff in the config");
    };
    StaffId::new(raw).context("invalid staff ID")
}

/// Parses a day as `YYYY-MM-DD`, `today` or `yesterday`.
pub fn parse_day(s: &str) -> Result<NaiveDate> {
    let today = Local::now().date_naive();
    match s {
        "today" => Ok(today),
        "yesterday" => Ok(today - Duration::days(1)),
        _ => parse_date(s).map_err(anyhow::Error::from),
    }
}

/// Parses an `HH:MM` argument, naming the flag on failure.
pub fn parse_time(s: &str, flag: &str) -> Result<WallTime> {
    WallTime::parse(s).with_context(|| format!("invalid {flag}"))
}

/// Validates and registers a category, returning the stored spelling.
///
/// Blank input means "no category" and is returned as an empty string.
pub fn register_category(db: &mut Database, raw: &str) -> Result<String> {
    if raw.trim().is_empty() {
        return Ok(String::new());
    }
    let category = Category::new(raw).context("invalid category")?;
    let (stored, _) = db.add_category(&category)?;
    Ok(stored.into())
}

/// Formats minutes as a duration string.
/// Returns "Xh Ym" if >= 1 hour, "Xm" if < 1 hour.
/// Negative durations are treated as 0m.
pub fn format_minutes(minutes: i64) -> String {
    if minutes < 0 {
        return "0m".to_string();
    }
    let hours = minutes / 60;
    let minutes = minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Formats minutes since midnight as `HH:MM`.
pub fn format_clock(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
