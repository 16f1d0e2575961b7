//! Timer commands: start a live timer and turn it into a session on stop.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::{Local, NaiveDateTime};
use clap::Args;
use uuid::Uuid;

use wl_core::{SessionId, WallTime, WorkSession};
use wl_db::RunningTimer;

use super::util::{open_database, register_category, resolve_staff};
use crate::Config;

#[derive(Debug, Args)]
pub struct TimerStartArgs {
    #[arg(long)]
    pub staff: Option<String>,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub project: String,
    #[arg(long, default_value = "")]
    pub category: String,
}

#[derive(Debug, Args)]
pub struct TimerStopArgs {
    #[arg(long)]
    pub staff: Option<String>,
}

pub fn start<W: Write>(writer: &mut W, args: &TimerStartArgs, config: &Config) -> Result<()> {
    start_at(writer, args, config, Local::now().naive_local())
}

pub fn stop<W: Write>(writer: &mut W, args: &TimerStopArgs, config: &Config) -> Result<()> {
    stop_at(writer, args, config, Local::now().naive_local())
}

fn start_at<W: Write>(
    writer: &mut W,
    args: &TimerStartArgs,
    config: &Config,
    now: NaiveDateTime,
) -> Result<()> {
    let staff_id = resolve_staff(args.staff.as_deref(), config)?;
    let mut db = open_database(config)?;
    if let Some(running) = db.running_timer(&staff_id)? {
        bail!(
            "timer already running for {staff_id} since {}",
            running.started_at.format("%Y-%m-%d %H:%M")
        );
    }

    let category = register_category(&mut db, &args.category)?;
    let timer = RunningTimer {
        staff_id: staff_id.clone(),
        started_at: now,
        description: args.description.trim().to_string(),
        project: args.project.trim().to_string(),
        category,
    };
    db.start_timer(&timer)?;
    tracing::info!(%staff_id, started_at = %now, "timer started");
    writeln!(
        writer,
        "Timer started for {staff_id} at {}",
        now.format("%H:%M")
    )?;
    Ok(())
}

/// Stops the timer, recording a session from its start to `now`.
///
/// A timer still running past midnight is closed at `24:00` of its start day.
/// A timer shorter than a minute is discarded. If `now` is before the start
/// the timer is left running and an error is returned.
fn stop_at<W: Write>(
    writer: &mut W,
    args: &TimerStopArgs,
    config: &Config,
    now: NaiveDateTime,
) -> Result<()> {
    let staff_id = resolve_staff(args.staff.as_deref(), config)?;
    let mut db = open_database(config)?;
    let Some(timer) = db.running_timer(&staff_id)? else {
        bail!("no timer running for {staff_id}");
    };
    if now < timer.started_at {
        bail!(
            "clock reads {}, before the timer start {}; timer left running",
            now.format("%Y-%m-%d %H:%M"),
            timer.started_at.format("%Y-%m-%d %H:%M")
        );
    }

    let date = timer.started_at.date();
    let start = WallTime::from_naive_time(timer.started_at.time());
    let end = if now.date() > date {
        tracing::warn!(%staff_id, "timer ran past midnight; closing at 24:00");
        WallTime::END_OF_DAY
    } else {
        WallTime::from_naive_time(now.time())
    };

    if start >= end {
        db.take_timer(&staff_id)?;
        writeln!(writer, "Timer discarded: ran for less than a minute")?;
        return Ok(());
    }

    let id = SessionId::new(Uuid::new_v4().to_string())?;
    let session = WorkSession::new(id, staff_id, date, start, end)?
        .with_description(timer.description)
        .with_project(timer.project)
        .with_category(timer.category);
    if !db.finish_timer(&session)? {
        bail!("no timer running for {}", session.staff_id);
    }
    writeln!(
        writer,
        "Recorded {} {}-{} for {}",
        session.date, session.start_time, session.end_time, session.staff_id
    )?;
    Ok(())
}
