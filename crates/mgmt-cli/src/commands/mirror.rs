//! Mirror command implementation

use std::path::Path;

use colored::Colorize;
use mgmt_fs::{PersistOptions, persist, read_resource};

use super::resolve_dir;
use crate::error::Result;

/// Persist the tree read from `src` into `dst`.
pub fn run_mirror(src: &Path, dst: &Path, keep_extraneous: bool, order_files: bool) -> Result<()> {
    let src_dir = resolve_dir(src)?;
    let tree = read_resource(&src_dir)?;

    let mut options = PersistOptions::default();
    if keep_extraneous {
        options = options.non_destructive();
    }
    if order_files {
        options = options.with_order_files();
    }
    persist(&tree, None, dst, &options)?;

    println!(
        "{} {} -> {}",
        "Mirrored".green().bold(),
        src_dir.display(),
        dst.display()
    );
    Ok(())
}
