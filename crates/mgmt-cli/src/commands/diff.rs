//! Diff command implementation
//!
//! Reads the actual tree into memory and walks the target directory
//! against it.

use std::path::Path;

use colored::Colorize;
use mgmt_diff::{DiffOptions, diff_dir, to_operations};
use mgmt_fs::read_resource;
use mgmt_model::PathAddress;

use super::resolve_dir;
use crate::error::Result;

/// Print the operations that bring `actual` in line with `target`.
pub fn run_diff(actual: &Path, target: &Path, json: bool, ignore_types: &[String]) -> Result<()> {
    let actual_dir = resolve_dir(actual)?;
    let target_dir = resolve_dir(target)?;

    let options = ignore_types
        .iter()
        .fold(DiffOptions::default(), |options, t| options.skip_type(t.as_str()));
    let live = read_resource(&actual_dir)?;
    let records = diff_dir(None, &PathAddress::root(), &live, &target_dir, &options)?;
    let operations = to_operations(&records)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&operations)?);
        return Ok(());
    }

    if operations.is_empty() {
        println!("{} No changes. Trees are in sync.", "OK".green().bold());
        return Ok(());
    }
    for (record, operation) in records.iter().zip(&operations) {
        let marker = if record.is_add() {
            "+".green()
        } else if record.is_remove() {
            "-".red()
        } else {
            "~".yellow()
        };
        println!("{marker} {operation}");
    }
    Ok(())
}
