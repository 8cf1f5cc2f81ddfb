//! Directory to resource tree reading

use std::path::Path;

use mgmt_model::Resource;

use crate::attributes::read_resource_file;
use crate::constants::ResourceFile;
use crate::io::{self, DirEntry};
use crate::order::list_ordered_dirs;
use crate::{Error, Result, escape};

/// Read the resource tree persisted in `dir`.
///
/// Reading is strict: the codec owns the whole directory, so any regular
/// file other than `attributes.dmr` or `order.txt` in a resource directory,
/// or other than `order.txt` in a type directory, is rejected. Child types
/// and children are registered in [`list_ordered_dirs`] order.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] if `dir` is not a directory
/// - [`Error::UnexpectedFile`] for a file the codec does not own
/// - [`Error::MalformedEncoding`] for an undecodable directory name
pub fn read_resource(dir: &Path) -> Result<Resource> {
    if !dir.is_dir() {
        return Err(Error::invalid_argument(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut resource = Resource::with_model(read_resource_file(dir)?);
    check_files(dir, &ResourceFile::ALL)?;

    for type_dir in list_ordered_dirs(dir)? {
        let child_type = escape::decode(&type_dir.name)?;
        check_files(&type_dir.path, &[ResourceFile::Order])?;
        for child_dir in list_ordered_dirs(&type_dir.path)? {
            let name = escape::decode(&child_dir.name)?;
            let child = read_resource(&child_dir.path)?;
            resource.register_child(child_type.as_ref(), name.as_ref(), child)?;
        }
    }
    Ok(resource)
}

/// Reject any regular file in `dir` other than the `allowed` reserved files.
///
/// A temporary file left by an interrupted write of an allowed file is
/// tolerated; the next destructive persist removes it.
pub fn check_files(dir: &Path, allowed: &[ResourceFile]) -> Result<()> {
    let unexpected = io::list_dir(dir)?.into_iter().find(|entry: &DirEntry| {
        !entry.is_dir && !is_owned(&entry.name, allowed)
    });
    match unexpected {
        Some(entry) => Err(Error::UnexpectedFile { path: entry.path }),
        None => Ok(()),
    }
}

fn is_owned(name: &str, allowed: &[ResourceFile]) -> bool {
    allowed
        .iter()
        .any(|f| f.as_str() == name || io::is_temp_for(name, f.as_str()))
}
