//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::category::CategoryAddArgs;
use crate::commands::day::DayArgs;
use crate::commands::import::ImportArgs;
use crate::commands::report::ReportArgs;
use crate::commands::session::{SessionAddArgs, SessionEditArgs, SessionListArgs, SessionRmArgs};
use crate::commands::staff::StaffAddArgs;
use crate::commands::timer::{TimerStartArgs, TimerStopArgs};

/// Staff work log.
///
/// Records work sessions, merges overlapping time and reports hours and
/// earnings per day.
#[derive(Debug, Parser)]
#[command(name = "wl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage staff members and their rates.
    #[command(subcommand)]
    Staff(StaffAction),

    /// Record, edit and remove work sessions.
    #[command(subcommand)]
    Session(SessionAction),

    /// Start and stop a live timer.
    #[command(subcommand)]
    Timer(TimerAction),

    /// Show one day's timeline, merged time and earnings.
    Day(DayArgs),

    /// Summarize hours and earnings per day over a date range.
    Report(ReportArgs),

    /// Manage session categories.
    #[command(subcommand)]
    Category(CategoryAction),

    /// Import sessions as JSON lines from stdin.
    Import(ImportArgs),
}

#[derive(Debug, Subcommand)]
pub enum StaffAction {
    /// Add a staff member or update an existing one.
    Add(StaffAddArgs),
    /// List staff members.
    List,
}

#[derive(Debug, Subcommand)]
pub enum SessionAction {
    /// Record a session.
    Add(SessionAddArgs),
    /// Change fields of a recorded session.
    Edit(SessionEditArgs),
    /// Delete a session.
    Rm(SessionRmArgs),
    /// List a staff member's sessions for a day.
    List(SessionListArgs),
}

#[derive(Debug, Subcommand)]
pub enum TimerAction {
    /// Start timing now.
    Start(TimerStartArgs),
    /// Stop the running timer and record it as a session.
    Stop(TimerStopArgs),
}

#[derive(Debug, Subcommand)]
pub enum CategoryAction {
    /// Register a category.
    Add(CategoryAddArgs),
    /// List registered categories.
    List,
}
