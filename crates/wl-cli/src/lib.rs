//! Work log CLI library.
//!
//! This crate provides the CLI interface for the work log.

mod cli;
pub mod commands;
mod config;

pub use cli::{CategoryAction, Cli, Commands, SessionAction, StaffAction, TimerAction};
pub use config::Config;
