//! Management tree CLI
//!
//! Inspects, compares and mirrors management trees persisted as directories.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    tracing::debug!(command = ?cli.command, "Starting");
    execute_command(cli.command)
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Encode { name } => commands::run_encode(&name),
        Commands::Decode { name } => commands::run_decode(&name),
        Commands::Show { dir, json } => commands::run_show(&dir, json),
        Commands::Diff {
            actual,
            target,
            json,
            ignore_types,
        } => commands::run_diff(&actual, &target, json, &ignore_types),
        Commands::Mirror {
            src,
            dst,
            keep_extraneous,
            order_files,
        } => commands::run_mirror(&src, &dst, keep_extraneous, order_files),
    }
}
