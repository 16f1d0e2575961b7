use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wl_cli::commands::{category, day, import, report, session, staff, timer};
use wl_cli::{CategoryAction, Cli, Commands, Config, SessionAction, StaffAction, TimerAction};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut out = io::stdout().lock();
    match command {
        Commands::Staff(action) => match action {
            StaffAction::Add(args) => staff::add(&mut out, args, &config)?,
            StaffAction::List => staff::list(&mut out, &config)?,
        },
        Commands::Session(action) => match action {
            SessionAction::Add(args) => {
                session::add(&mut out, args, &config)?;
            }
            SessionAction::Edit(args) => session::edit(&mut out, args, &config)?,
            SessionAction::Rm(args) => session::remove(&mut out, args, &config)?,
            SessionAction::List(args) => session::list(&mut out, args, &config)?,
        },
        Commands::Timer(action) => match action {
            TimerAction::Start(args) => timer::start(&mut out, args, &config)?,
            TimerAction::Stop(args) => timer::stop(&mut out, args, &config)?,
        },
        Commands::Day(args) => day::run(&mut out, args, &config)?,
        Commands::Report(args) => report::run(&mut out, args, &config)?,
        Commands::Category(action) => match action {
            CategoryAction::Add(args) => category::add(&mut out, args, &config)?,
            CategoryAction::List => category::list(&mut out, &config)?,
        },
        Commands::Import(args) => {
            let inserted = import::run(io::stdin().lock(), &mut out, args, &config)?;
            tracing::debug!(inserted, "import finished");
        }
    }

    Ok(())
}
