//! Import command for loading sessions into the local `SQLite` store.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use uuid::Uuid;

use wl_core::clock::parse_date;
use wl_core::{SessionId, StaffId, WallTime, WorkSession};

use super::util::{open_database, register_category};
use crate::Config;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Staff ID to apply when incoming sessions omit `staff_id`.
    #[arg(long)]
    pub staff: Option<String>,
}

pub fn run<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    args: &ImportArgs,
    config: &Config,
) -> Result<usize> {
    let default_staff = args.staff.as_deref().or(config.default_staff.as_deref());
    let mut sessions = parse_sessions(reader, default_staff)?;

    let mut db = open_database(config)?;
    for session in &mut sessions {
        session.category = register_category(&mut db, &session.category)
            .with_context(|| format!("invalid category in session {}", session.id))?;
    }
    let inserted = db.insert_sessions(&sessions)?;
    let skipped = sessions.len() - inserted;
    if skipped > 0 {
        tracing::warn!(skipped, "skipped sessions with existing IDs");
    }
    writeln!(
        writer,
        "Imported {inserted} sessions ({skipped} duplicates skipped)"
    )?;
    Ok(inserted)
}

fn parse_sessions<R: BufRead>(reader: R, default_staff: Option<&str>) -> Result<Vec<WorkSession>> {
    let mut sessions = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let parsed: ImportSession = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid JSON on line {}", idx + 1))?;
        let session = parsed
            .into_session(default_staff)
            .with_context(|| format!("invalid session on line {}", idx + 1))?;
        sessions.push(session);
    }
    Ok(sessions)
}

#[derive(Debug, Deserialize)]
struct ImportSession {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    staff_id: Option<String>,
    date: String,
    start_time: String,
    end_time: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    project: String,
    #[serde(default)]
    category: String,
}

impl ImportSession {
    fn into_session(self, default_staff: Option<&str>) -> Result<WorkSession> {
        let staff = match self.staff_id {
            Some(staff) if !staff.trim().is_empty() => staff,
            _ => default_staff
                .map(str::to_string)
                .filter(|val| !val.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("missing staff_id"))?,
        };
        let id = match self.id {
            Some(id) if !id.trim().is_empty() => id,
            _ => Uuid::new_v4().to_string(),
        };
        let session = WorkSession::new(
            SessionId::new(id)?,
            StaffId::new(staff)?,
            parse_date(&self.date)?,
            WallTime::parse(&self.start_time)?,
            WallTime::parse(&self.end_time)?,
        )?
        .with_description(self.description.trim())
        .with_project(self.project.trim())
        .with_category(self.category.trim());
        Ok(session)
    }
}
