//! Staff commands: add or update a staff member, list staff.

use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Args;

use wl_core::{HourlyRate, StaffId};
use wl_db::StaffRecord;

use super::util::open_database;
use crate::Config;

#[derive(Debug, Args)]
pub struct StaffAddArgs {
    /// Staff ID used to group sessions.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Hourly rate used for earnings.
    #[arg(long, default_value_t = 0.0)]
    pub rate: f64,
}

pub fn add<W: Write>(writer: &mut W, args: &StaffAddArgs, config: &Config) -> Result<()> {
    let name = args.name.trim();
    if name.is_empty() {
        bail!("name cannot be empty");
    }
    let record = StaffRecord {
        id: StaffId::new(args.id.as_str()).context("invalid staff ID")?,
        name: name.to_string(),
        hourly_rate: HourlyRate::new(args.rate).context("invalid --rate")?,
    };

    let mut db = open_database(config)?;
    db.upsert_staff(&record)?;
    writeln!(
        writer,
        "Saved {} ({}) at {}/h",
        record.id, record.name, record.hourly_rate
    )?;
    Ok(())
}

pub fn list<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let db = open_database(config)?;
    let staff = db.list_staff()?;
    if staff.is_empty() {
        writeln!(writer, "No staff recorded.")?;
        return Ok(());
    }
    for member in staff {
        writeln!(
            writer,
            "{:<12} {:<24} {:>8}/h",
            member.id.as_str(),
            member.name,
            member.hourly_rate.to_string()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    fn test_config(temp: &tempfile::TempDir) -> Config {
        Config {
            database_path: temp.path().join("worklog.db"),
            adjacency_tolerance_minutes: 15,
            default_staff: None,
        }
    }

    #[test]
    fn add_then_list_staff() {
        let temp = tempfile::tempdir().unwrap();
        let config = test_config(&temp);

        let mut output = Vec::new();
        let args = StaffAddArgs {
            id: "alice".to_string(),
            name: "Alice Smith".to_string(),
            rate: 45.0,
        };
        add(&mut output, &args, &config).unwrap();
        list(&mut output, &config).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        Saved alice (Alice Smith) at 45.00/h
        alice        Alice Smith                 45.00/h
        ");
    }

    #[test]
    fn add_rejects_negative_rate() {
        let temp = tempfile::tempdir().unwrap();
        let config = test_config(&temp);
        let args = StaffAddArgs {
            id: "alice".to_string(),
            name: "Alice".to_string(),
            rate: -10.0,
        };
        let err = add(&mut Vec::new(), &args, &config).unwrap_err();
        assert!(err.to_string().contains("invalid --rate"));
    }

    #[test]
    fn list_without_staff() {
        let temp = tempfile::tempdir().unwrap();
        let config = test_config(&temp);
        let mut output = Vec::new();
        list(&mut output, &config).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "No staff recorded.\n");
    }
}
