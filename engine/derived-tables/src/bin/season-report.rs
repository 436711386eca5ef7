//! # Season Report Binary
//!
//! Command-line report over scored season tables.

use anyhow::Result;
use clap::Parser;
use derived_tables::cli::{run, Cli};

fn main() -> Result<()> {
    run(Cli::parse())
}
