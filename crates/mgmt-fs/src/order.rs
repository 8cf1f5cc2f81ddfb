//! Child order manifests (`order.txt`)
//!
//! A manifest lists subdirectory names, one per line. Surrounding whitespace
//! is trimmed; blank lines and lines starting with `#` are ignored.

use std::collections::HashSet;
use std::path::Path;

use crate::constants::ResourceFile;
use crate::io::{self, DirEntry};
use crate::{Error, Result};

/// Names listed by manifest `content`, in order.
pub fn manifest_names(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Subdirectories of `dir` in iteration order.
///
/// Without a manifest the subdirectories come back sorted by name. With a
/// manifest the listed directories come first, in manifest order, followed
/// by unlisted subdirectories sorted by name. Every subdirectory appears
/// exactly once.
///
/// # Errors
///
/// [`Error::IllegalState`] if a listed name is missing, is not a directory,
/// or is listed twice.
pub fn list_ordered_dirs(dir: &Path) -> Result<Vec<DirEntry>> {
    let mut dirs: Vec<DirEntry> = io::list_dir(dir)?
        .into_iter()
        .filter(|e| e.is_dir)
        .collect();

    let manifest = dir.join(ResourceFile::Order);
    if !manifest.is_file() {
        return Ok(dirs);
    }

    let content = io::read_text(&manifest)?;
    let mut listed = HashSet::new();
    let mut ordered = Vec::with_capacity(dirs.len());
    for name in manifest_names(&content) {
        if !listed.insert(name) {
            return Err(Error::illegal_state(format!(
                "'{}' is listed more than once in {}",
                name,
                manifest.display()
            )));
        }
        let Some(pos) = dirs.iter().position(|e| e.name == name) else {
            let problem = if dir.join(name).exists() {
                "is not a directory"
            } else {
                "does not exist"
            };
            return Err(Error::illegal_state(format!(
                "'{}' from {} {}",
                name,
                manifest.display(),
                problem
            )));
        };
        ordered.push(dirs.remove(pos));
    }

    ordered.extend(dirs);
    Ok(ordered)
}

/// Write a manifest listing `names` into `dir`.
pub fn write_order_file<S: AsRef<str>>(dir: &Path, names: &[S]) -> Result<()> {
    let mut content = String::new();
    for name in names {
        content.push_str(name.as_ref());
        content.push('\n');
    }
    io::write_atomic(&dir.join(ResourceFile::Order), content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn names(entries: Vec<DirEntry>) -> Vec<String> {
        entries.into_iter().map(|e| e.name).collect()
    }

    #[test]
    fn manifest_skips_comments_and_blanks() {
        let content = "# header\n\n  b  \na\n   \n#c\n";
        assert_eq!(manifest_names(content).collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn without_manifest_dirs_are_sorted() {
        let dir = tempdir().unwrap();
        for name in ["c", "a", "b"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        fs::write(dir.path().join("attributes.dmr"), "{}").unwrap();

        assert_eq!(names(list_ordered_dirs(dir.path()).unwrap()), vec!["a", "b", "c"]);
    }

    #[test]
    fn unlisted_dirs_are_appended() {
        let dir = tempdir().unwrap();
        for name in ["a", "b", "c", "d"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        write_order_file(dir.path(), &["c", "a"]).unwrap();

        assert_eq!(
            names(list_ordered_dirs(dir.path()).unwrap()),
            vec!["c", "a", "b", "d"]
        );
    }

    #[test]
    fn listed_file_is_rejected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("attributes.dmr"), "{}").unwrap();
        fs::write(dir.path().join("order.txt"), "attributes.dmr\n").unwrap();

        let err = list_ordered_dirs(dir.path()).unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }

    #[test]
    fn missing_and_duplicate_entries_are_rejected() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();

        fs::write(dir.path().join("order.txt"), "ghost\n").unwrap();
        let err = list_ordered_dirs(dir.path()).unwrap_err();
        assert!(err.to_string().contains("does not exist"));

        fs::write(dir.path().join("order.txt"), "a\na\n").unwrap();
        let err = list_ordered_dirs(dir.path()).unwrap_err();
        assert!(matches!(err, Error::IllegalState { .. }));
    }
}
