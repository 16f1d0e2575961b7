//! Report command: merged hours and earnings per day over a date range.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

use wl_core::{HourlyRate, MergeConfig, StaffId, WorkSession, earnings, total_minutes};

use super::util::{format_minutes, open_database, parse_day, resolve_staff};
use crate::Config;

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[arg(long)]
    pub staff: Option<String>,
    /// First day of the range (inclusive).
    #[arg(long)]
    pub from: String,
    /// Last day of the range (inclusive).
    #[arg(long, default_value = "today")]
    pub to: String,
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Merged totals for one day.
///
/// `earnings` is `None` when the staff member has no recorded rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayTotal {
    pub date: NaiveDate,
    pub total_minutes: i64,
    pub total_hours: f64,
    pub earnings: Option<f64>,
}

/// Computed report data.
#[derive(Debug, Serialize)]
pub struct ReportData {
    pub staff_id: StaffId,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub hourly_rate: Option<HourlyRate>,
    pub days: Vec<DayTotal>,
    pub totals: ReportTotals,
}

#[derive(Debug, Serialize)]
pub struct ReportTotals {
    pub total_minutes: i64,
    pub total_hours: f64,
    pub earnings: Option<f64>,
    pub day_count: usize,
}

/// Groups sessions by day and totals each day separately.
///
/// Merging happens within a day only; days with no sessions are omitted.
#[expect(
    clippy::cast_precision_loss,
    reason = "minute totals are far below 2^52"
)]
pub fn daily_totals(
    sessions: &[WorkSession],
    hourly_rate: Option<HourlyRate>,
    config: &MergeConfig,
) -> Vec<DayTotal> {
    let mut by_day: BTreeMap<NaiveDate, Vec<WorkSession>> = BTreeMap::new();
    for session in sessions {
        by_day.entry(session.date).or_default().push(session.clone());
    }

    by_day
        .into_iter()
        .map(|(date, day)| {
            let minutes = total_minutes(&day, config);
            DayTotal {
                date,
                total_minutes: minutes,
                total_hours: minutes as f64 / 60.0,
                earnings: hourly_rate.map(|rate| earnings(&day, rate.value(), config)),
            }
        })
        .collect()
}

/// Generates report data from the database.
pub fn generate_report_data(args: &ReportArgs, config: &Config) -> Result<ReportData> {
    let staff_id = resolve_staff(args.staff.as_deref(), config)?;
    let from = parse_day(&args.from)?;
    let to = parse_day(&args.to)?;
    if from > to {
        bail!("--from ({from}) must not be after --to ({to})");
    }

    let db = open_database(config)?;
    let hourly_rate = db.get_staff(&staff_id)?.map(|staff| staff.hourly_rate);
    let sessions = db.list_sessions_in_range(&staff_id, from, to)?;
    tracing::debug!(count = sessions.len(), %from, %to, "loaded sessions for report");

    let days = daily_totals(&sessions, hourly_rate, &config.merge_config());
    let total: i64 = days.iter().map(|day| day.total_minutes).sum();
    #[expect(
        clippy::cast_precision_loss,
        reason = "minute totals are far below 2^52"
    )]
    let totals = ReportTotals {
        total_minutes: total,
        total_hours: total as f64 / 60.0,
        earnings: hourly_rate.map(|_| days.iter().filter_map(|day| day.earnings).sum()),
        day_count: days.len(),
    };

    Ok(ReportData {
        staff_id,
        from,
        to,
        hourly_rate,
        days,
        totals,
    })
}

fn format_earnings(amount: Option<f64>) -> String {
    amount.map_or_else(|| "n/a".to_string(), |amount| format!("{amount:.2}"))
}

/// Formats the human-readable report output.
pub fn format_report(data: &ReportData) -> String {
    let mut output = String::new();
    writeln!(
        output,
        "REPORT: {}, {} to {}",
        data.staff_id, data.from, data.to
    )
    .unwrap();

    if data.days.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "No sessions recorded in this range.").unwrap();
        return output;
    }

    writeln!(output).unwrap();
    for day in &data.days {
        writeln!(
            output,
            "{}  {}  {:>7}  {:>8}",
            day.date,
            day.date.format("%a"),
            format_minutes(day.total_minutes),
            format_earnings(day.earnings)
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(
        output,
        "Total ({} days)  {:>7}  {:>8}",
        data.totals.day_count,
        format_minutes(data.totals.total_minutes),
        format_earnings(data.totals.earnings)
    )
    .unwrap();
    output
}

pub fn run<W: Write>(writer: &mut W, args: &ReportArgs, config: &Config) -> Result<()> {
    let data = generate_report_data(args, config)?;
    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&data)?)?;
    } else {
        write!(writer, "{}", format_report(&data))?;
    }
    Ok(())
}
