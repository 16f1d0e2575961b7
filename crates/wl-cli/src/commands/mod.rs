//! CLI subcommand implementations.

pub mod category;
pub mod day;
pub mod import;
pub mod report;
pub mod session;
pub mod staff;
pub mod timer;
pub mod util;
