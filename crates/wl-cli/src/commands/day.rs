//! Day command: timeline blocks, merged spans and totals for one day.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use wl_core::{DaySummary, HourlyRate, StaffId};

use super::util::{format_clock, format_minutes, open_database, parse_day, resolve_staff};
use crate::Config;

#[derive(Debug, Args)]
pub struct DayArgs {
    #[arg(long)]
    pub staff: Option<String>,
    /// Day to show (YYYY-MM-DD, today, yesterday).
    #[arg(long, default_value = "today")]
    pub date: String,
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// JSON day structure.
#[derive(Debug, Serialize)]
pub struct JsonDay<'a> {
    pub staff_id: &'a StaffId,
    pub hourly_rate: Option<HourlyRate>,
    #[serde(flatten)]
    pub summary: &'a DaySummary,
}

pub fn run<W: Write>(writer: &mut W, args: &DayArgs, config: &Config) -> Result<()> {
    let staff_id = resolve_staff(args.staff.as_deref(), config)?;
    let date = parse_day(&args.date)?;
    let db = open_database(config)?;

    let rate = db.get_staff(&staff_id)?.map(|staff| staff.hourly_rate);
    if rate.is_none() {
        tracing::warn!(%staff_id, "no staff record; earnings use a zero rate");
    }
    let sessions = db.list_sessions_for_day(&staff_id, date)?;
    tracing::debug!(count = sessions.len(), %date, "loaded sessions");

    let summary = DaySummary::build(
        date,
        &sessions,
        rate.map_or(0.0, HourlyRate::value),
        &config.merge_config(),
    );

    if args.json {
        let json = JsonDay {
            staff_id: &staff_id,
            hourly_rate: rate,
            summary: &summary,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&json)?)?;
    } else {
        write!(writer, "{}", format_day(&staff_id, rate, &summary))?;
    }
    Ok(())
}

fn project_label(project: &str) -> &str {
    if project.is_empty() { "(no project)" } else { project }
}

/// Formats the human-readable day view.
pub fn format_day(staff_id: &StaffId, rate: Option<HourlyRate>, summary: &DaySummary) -> String {
    let mut output = String::new();

    let heading = summary.date.format("%A, %b %-d, %Y");
    writeln!(output, "WORK LOG: {heading} ({staff_id})").unwrap();

    if summary.blocks.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "No sessions recorded.").unwrap();
        return output;
    }

    writeln!(output).unwrap();
    writeln!(output, "TIMELINE").unwrap();
    writeln!(output, "────────").unwrap();
    for block in &summary.blocks {
        let line = format!(
            "{}-{}  {:<8} {:<13} {}",
            format_clock(block.start),
            format_clock(block.end),
            format_minutes(i64::from(block.duration)),
            project_label(&block.project),
            block.description
        );
        writeln!(output, "{}", line.trim_end()).unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "MERGED").unwrap();
    writeln!(output, "──────").unwrap();
    for span in &summary.merged {
        let line = format!(
            "{}-{}  {:<8} {}",
            span.start,
            span.end,
            format_minutes(i64::from(span.duration_minutes())),
            span.description
        );
        writeln!(output, "{}", line.trim_end()).unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "BY PROJECT").unwrap();
    writeln!(output, "──────────").unwrap();
    for project in &summary.by_project {
        writeln!(
            output,
            "{:<13} {}",
            project_label(&project.project),
            format_minutes(project.minutes)
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(
        output,
        "Total worked:  {} ({:.2} h)",
        format_minutes(summary.total_minutes),
        summary.total_hours
    )
    .unwrap();
    match rate {
        Some(rate) => writeln!(output, "Earnings:      {:.2} at {rate}/h", summary.earnings).unwrap(),
        None => writeln!(output, "Earnings:      n/a (no staff record for {staff_id})").unwrap(),
    }

    output
}
