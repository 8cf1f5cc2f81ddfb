//! Command implementations

mod diff;
mod mirror;
mod names;
mod show;

use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};

pub use diff::run_diff;
pub use mirror::run_mirror;
pub use names::{run_decode, run_encode};
pub use show::run_show;

/// Canonical path of an existing directory.
pub(crate) fn resolve_dir(path: &Path) -> Result<PathBuf> {
    let resolved = dunce::canonicalize(path)
        .map_err(|e| CliError::user(format!("Cannot access {}: {e}", path.display())))?;
    if !resolved.is_dir() {
        return Err(CliError::user(format!(
            "{} is not a directory",
            resolved.display()
        )));
    }
    Ok(resolved)
}
