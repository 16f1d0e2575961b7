//! Session commands: add, edit, remove and list recorded work sessions.

use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Args;
use uuid::Uuid;

use wl_core::{SessionId, WorkSession};

use super::util::{open_database, parse_day, parse_time, register_category, resolve_staff};
use crate::Config;

#[derive(Debug, Args)]
pub struct SessionAddArgs {
    /// Staff member the session belongs to.
    #[arg(long)]
    pub staff: Option<String>,
    /// Day of the session (YYYY-MM-DD, today, yesterday).
    #[arg(long, default_value = "today")]
    pub date: String,
    /// Start time (HH:MM).
    #[arg(long)]
    pub start: String,
    /// End time (HH:MM, 24:00 allowed).
    #[arg(long)]
    pub end: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub project: String,
    #[arg(long, default_value = "")]
    pub category: String,
}

#[derive(Debug, Args)]
pub struct SessionEditArgs {
    /// Session ID to edit.
    pub id: String,
    #[arg(long)]
    pub staff: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub start: Option<String>,
    #[arg(long)]
    pub end: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub project: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Debug, Args)]
pub struct SessionRmArgs {
    /// Session ID to delete.
    pub id: String,
}

#[derive(Debug, Args)]
pub struct SessionListArgs {
    #[arg(long)]
    pub staff: Option<String>,
    /// Day to list (YYYY-MM-DD, today, yesterday).
    #[arg(long, default_value = "today")]
    pub date: String,
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn add<W: Write>(writer: &mut W, args: &SessionAddArgs, config: &Config) -> Result<SessionId> {
    let staff_id = resolve_staff(args.staff.as_deref(), config)?;
    let date = parse_day(&args.date)?;
    let start = parse_time(&args.start, "--start")?;
    let end = parse_time(&args.end, "--end")?;
    let id = SessionId::new(Uuid::new_v4().to_string())?;
    let session = WorkSession::new(id, staff_id, date, start, end)?
        .with_description(args.description.trim())
        .with_project(args.project.trim());

    let mut db = open_database(config)?;
    let category = register_category(&mut db, &args.category)?;
    let session = session.with_category(category);
    db.insert_session(&session)?;

    writeln!(
        writer,
        "Recorded {} {}-{} for {}",
        session.date, session.start_time, session.end_time, session.staff_id
    )?;
    Ok(session.id)
}

pub fn edit<W: Write>(writer: &mut W, args: &SessionEditArgs, config: &Config) -> Result<()> {
    let id = SessionId::new(args.id.as_str()).context("invalid session ID")?;
    let mut db = open_database(config)?;
    let Some(mut session) = db.get_session(&id)? else {
        bail!("session not found: {id}");
    };

    if let Some(staff) = &args.staff {
        session.staff_id = resolve_staff(Some(staff.as_str()), config)?;
    }
    if let Some(date) = &args.date {
        session.date = parse_day(date)?;
    }
    if let Some(start) = &args.start {
        session.start_time = parse_time(start, "--start")?;
    }
    if let Some(end) = &args.end {
        session.end_time = parse_time(end, "--end")?;
    }
    if let Some(description) = &args.description {
        session.description = description.trim().to_string();
    }
    if let Some(project) = &args.project {
        session.project = project.trim().to_string();
    }
    session.validate()?;
    if let Some(category) = &args.category {
        session.category = register_category(&mut db, category)?;
    }

    db.update_session(&session)?;
    writeln!(
        writer,
        "Updated {id}: {} {}-{}",
        session.date, session.start_time, session.end_time
    )?;
    Ok(())
}

pub fn remove<W: Write>(writer: &mut W, args: &SessionRmArgs, config: &Config) -> Result<()> {
    let id = SessionId::new(args.id.as_str()).context("invalid session ID")?;
    let mut db = open_database(config)?;
    if !db.delete_session(&id)? {
        bail!("session not found: {id}");
    }
    writeln!(writer, "Deleted {id}")?;
    Ok(())
}

pub fn list<W: Write>(writer: &mut W, args: &SessionListArgs, config: &Config) -> Result<()> {
    let staff_id = resolve_staff(args.staff.as_deref(), config)?;
    let date = parse_day(&args.date)?;
    let db = open_database(config)?;
    let sessions = db.list_sessions_for_day(&staff_id, date)?;

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&sessions)?)?;
        return Ok(());
    }

    if sessions.is_empty() {
        writeln!(writer, "No sessions for {staff_id} on {date}.")?;
        return Ok(());
    }
    for session in &sessions {
        writeln!(
            writer,
            "{}  {}-{}  {:<12} {}",
            session.id, session.start_time, session.end_time, session.project, session.description
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use wl_core::clock::parse_date;
    use wl_core::StaffId;
    use wl_db::Database;

    fn test_config(temp: &tempfile::TempDir) -> Config {
        Config {
            database_path: temp.path().join("worklog.db"),
            adjacency_tolerance_minutes: 15,
            default_staff: Some("alice".to_string()),
        }
    }

    fn add_args(start: &str, end: &str) -> SessionAddArgs {
        SessionAddArgs {
            staff: None,
            date: "2025-03-14".to_string(),
            start: start.to_string(),
            end: end.to_string(),
            description: "Fix header".to_string(),
            project: "website".to_string(),
            category: " Development ".to_string(),
        }
    }

    #[test]
    fn add_records_session_and_category() {
        let temp = tempfile::tempdir().unwrap();
        let config = test_config(&temp);
        let mut output = Vec::new();

        let id = add(&mut output, &add_args("09:00", "10:30"), &config).unwrap();

        let db = Database::open(&config.database_path).unwrap();
        let stored = db.get_session(&id).unwrap().unwrap();
        assert_eq!(stored.staff_id.as_str(), "alice");
        assert_eq!(stored.category, "Development");
        assert_eq!(db.list_categories().unwrap().len(), 1);

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @"Recorded 2025-03-14 09:00-10:30 for alice");
    }

    #[test]
    fn add_reuses_registered_category_spelling() {
        let temp = tempfile::tempdir().unwrap();
        let config = test_config(&temp);
        add(&mut Vec::new(), &add_args("09:00", "10:00"), &config).unwrap();

        let mut args = add_args("11:00", "12:00");
        args.category = "DEVELOPMENT".to_string();
        let id = add(&mut Vec::new(), &args, &config).unwrap();

        let db = Database::open(&config.database_path).unwrap();
        assert_eq!(db.get_session(&id).unwrap().unwrap().category, "Development");
        let names: Vec<String> = db
            .list_categories()
            .unwrap()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(names, vec!["Development"]);
    }

    #[test]
    fn add_rejects_inverted_interval() {
        let temp = tempfile::tempdir().unwrap();
        let config = test_config(&temp);
        let err = add(&mut Vec::new(), &add_args("10:00", "09:00"), &config).unwrap_err();
        assert_eq!(err.to_string(), "start time 10:00 must be before end time 09:00");
    }

    #[test]
    fn add_rejects_malformed_time() {
        let temp = tempfile::tempdir().unwrap();
        let config = test_config(&temp);
        let err = add(&mut Vec::new(), &add_args("9am", "10:00"), &config).unwrap_err();
        assert!(err.to_string().contains("invalid --start"));
    }

    #[test]
    fn edit_validates_new_interval() {
        let temp = tempfile::tempdir().unwrap();
        let config = test_config(&temp);
        let id = add(&mut Vec::new(), &add_args("09:00", "10:00"), &config).unwrap();

        let mut args = SessionEditArgs {
            id: id.to_string(),
            staff: None,
            date: None,
            start: Some("11:00".to_string()),
            end: None,
            description: None,
            project: None,
            category: None,
        };
        assert!(edit(&mut Vec::new(), &args, &config).is_err());

        args.end = Some("12:00".to_string());
        args.description = Some("Review".to_string());
        edit(&mut Vec::new(), &args, &config).unwrap();

        let db = Database::open(&config.database_path).unwrap();
        let stored = db.get_session(&id).unwrap().unwrap();
        assert_eq!(stored.start_time.to_string(), "11:00");
        assert_eq!(stored.end_time.to_string(), "12:00");
        assert_eq!(stored.description, "Review");
    }

    #[test]
    fn remove_missing_session_fails() {
        let temp = tempfile::tempdir().unwrap();
        let config = test_config(&temp);
        let args = SessionRmArgs {
            id: "missing".to_string(),
        };
        let err = remove(&mut Vec::new(), &args, &config).unwrap_err();
        assert_eq!(err.to_string(), "session not found: missing");
    }

    #[test]
    fn list_prints_sessions_in_order() {
        let temp = tempfile::tempdir().unwrap();
        let config = test_config(&temp);
        let mut db = Database::open(&config.database_path).unwrap();
        let staff = StaffId::new("alice").unwrap();
        let date = parse_date("2025-03-14").unwrap();
        let make = |id: &str, start: &str, end: &str, project: &str, description: &str| {
            WorkSession::new(
                SessionId::new(id).unwrap(),
                staff.clone(),
                date,
                start.parse().unwrap(),
                end.parse().unwrap(),
            )
            .unwrap()
            .with_project(project)
            .with_description(description)
        };
        db.insert_sessions(&[
            make("s2", "13:00", "14:00", "crm", "Calls"),
            make("s1", "09:00", "10:00", "website", "Fix header"),
        ])
        .unwrap();

        let args = SessionListArgs {
            staff: None,
            date: "2025-03-14".to_string(),
            json: false,
        };
        let mut output = Vec::new();
        list(&mut output, &args, &config).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        s1  09:00-10:00  website      Fix header
        s2  13:00-14:00  crm          Calls
        ");
    }
}
