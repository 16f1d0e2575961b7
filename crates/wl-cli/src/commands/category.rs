//! Category commands.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use wl_core::Category;

use super::util::open_database;
use crate::Config;

#[derive(Debug, Args)]
pub struct CategoryAddArgs {
    /// Category name (at most 50 characters).
    pub name: String,
}

pub fn add<W: Write>(writer: &mut W, args: &CategoryAddArgs, config: &Config) -> Result<()> {
    let category = Category::new(&args.name).context("invalid category")?;
    let mut db = open_database(config)?;
    let (stored, created) = db.add_category(&category)?;
    if created {
        writeln!(writer, "Added category {stored}")?;
    } else {
        writeln!(writer, "Category {stored} already exists")?;
    }
    Ok(())
}

pub fn list<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let db = open_database(config)?;
    let categories = db.list_categories()?;
    if categories.is_empty() {
        writeln!(writer, "No categories.")?;
    }
    for category in categories {
        writeln!(writer, "{category}")?;
    }
    Ok(())
}
