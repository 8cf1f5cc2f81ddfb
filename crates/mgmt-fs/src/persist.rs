//! Resource tree to directory persistence
//!
//! Layout: a resource is a directory holding `attributes.dmr` and one
//! subdirectory per child type; a type directory holds one subdirectory per
//! child, named through [`escape::encode`].
//!
//! In destructive mode the directory is mirrored exactly: entries with no
//! counterpart in the tree are removed once every live child type has been
//! written. Reserved files and ignored types are never removed.

use std::collections::HashSet;
use std::path::Path;

use mgmt_model::{
    Model, PathAddress, PathElement, Registration, Resource, is_config_attribute, is_persistent,
    is_registration_persistent,
};

use crate::attributes::write_resource_file;
use crate::constants::ResourceFile;
use crate::{Error, Result, escape, io, order};

/// Options for [`persist`].
#[derive(Debug, Clone)]
pub struct PersistOptions {
    /// Remove directory entries with no counterpart in the tree
    pub destructive: bool,
    /// Child types of the root resource that are neither written nor
    /// removed
    pub ignore_types: HashSet<String>,
    /// Write `order.txt` manifests recording type and child order
    pub write_order_files: bool,
}

impl Default for PersistOptions {
    fn default() -> Self {
        Self {
            destructive: true,
            ignore_types: HashSet::new(),
            write_order_files: false,
        }
    }
}

impl PersistOptions {
    pub fn non_destructive(mut self) -> Self {
        self.destructive = false;
        self
    }

    pub fn ignore_type(mut self, child_type: impl Into<String>) -> Self {
        self.ignore_types.insert(child_type.into());
        self
    }

    pub fn with_order_files(mut self) -> Self {
        self.write_order_files = true;
        self
    }
}

/// Persist `resource` into `dir`.
///
/// Nothing is touched when the resource is not persistable. The operation is
/// not transactional: a failure leaves the tree partially updated, and
/// running it again with the same tree converges to the same final state.
///
/// # Errors
///
/// - [`Error::Io`] when a directory or file cannot be written
/// - [`Error::IllegalState`] for a blank child name
/// - [`Error::ChildRegistrationMissing`] when metadata is present but has no
///   entry for a child
pub fn persist(
    resource: &Resource,
    registration: Option<&dyn Registration>,
    dir: &Path,
    options: &PersistOptions,
) -> Result<()> {
    tracing::info!(dir = %dir.display(), destructive = options.destructive, "Persisting resource tree");
    let mut writer = TreeWriter {
        options,
        removed: 0,
    };
    writer.persist_node(
        resource,
        registration,
        dir,
        &PathAddress::root(),
        &options.ignore_types,
    )?;
    tracing::debug!(removed = writer.removed, "Persist finished");
    Ok(())
}

struct TreeWriter<'o> {
    options: &'o PersistOptions,
    removed: usize,
}

impl TreeWriter<'_> {
    fn persist_node(
        &mut self,
        resource: &Resource,
        registration: Option<&dyn Registration>,
        dir: &Path,
        address: &PathAddress,
        ignore_types: &HashSet<String>,
    ) -> Result<()> {
        if !is_persistent(resource, registration) {
            tracing::debug!(%address, "Skipping non-persistent resource");
            return Ok(());
        }

        let types: Vec<&str> = resource
            .child_types()
            .filter(|t| !ignore_types.contains(*t))
            .collect();

        let existed = dir.is_dir();
        if !existed {
            io::ensure_dir(dir)?;
        }

        let stale = if self.options.destructive && existed {
            let keep: HashSet<String> = types
                .iter()
                .copied()
                .chain(ignore_types.iter().map(String::as_str))
                .map(|t| escape::encode(t).into_owned())
                .collect();
            stale_entries(dir, &ResourceFile::ALL, &keep)?
        } else {
            Vec::new()
        };

        let no_ignore = HashSet::new();
        let mut type_dirs = Vec::with_capacity(types.len());
        for child_type in types {
            let type_dir_name = escape::encode(child_type).into_owned();
            let type_dir = dir.join(&type_dir_name);
            let type_existed = type_dir.is_dir();
            if !type_existed {
                io::ensure_dir(&type_dir)?;
            }

            let mut stale_children = if self.options.destructive && type_existed {
                stale_entries(&type_dir, &[ResourceFile::Order], &HashSet::new())?
            } else {
                Vec::new()
            };

            let mut child_dirs = Vec::new();
            for (name, child) in resource.children(child_type) {
                if !is_persistent(child, None) {
                    continue;
                }
                let child_address = address.child(child_type, name);
                if name.trim().is_empty() {
                    return Err(Error::illegal_state(format!(
                        "Child name is empty. Resource type {}, path '{}'",
                        child_type,
                        dir.display()
                    )));
                }
                let child_reg = match registration {
                    None => None,
                    Some(reg) => {
                        let element = PathElement::new(child_type, name);
                        match reg.sub_model(&element) {
                            None => {
                                return Err(Error::ChildRegistrationMissing {
                                    address: child_address.to_string(),
                                });
                            }
                            Some(sub) if !is_registration_persistent(sub) => continue,
                            Some(sub) => Some(sub),
                        }
                    }
                };

                let child_dir_name = escape::encode(name).into_owned();
                stale_children.retain(|entry| *entry != child_dir_name);
                self.persist_node(
                    child,
                    child_reg,
                    &type_dir.join(&child_dir_name),
                    &child_address,
                    &no_ignore,
                )?;
                child_dirs.push(child_dir_name);
            }

            for entry in stale_children {
                self.remove(&type_dir.join(entry));
            }
            self.update_order_file(&type_dir, &child_dirs)?;
            type_dirs.push(type_dir_name);
        }

        for entry in stale {
            self.remove(&dir.join(entry));
        }
        self.update_order_file(dir, &type_dirs)?;

        write_resource_file(dir, &persisted_model(resource, registration))?;
        tracing::debug!(%address, dir = %dir.display(), "Persisted resource");
        Ok(())
    }

    /// Write the manifest for `names`, or drop a manifest left behind by an
    /// earlier run when no manifest is wanted here.
    fn update_order_file(&mut self, dir: &Path, names: &[String]) -> Result<()> {
        if self.options.write_order_files && !names.is_empty() {
            return order::write_order_file(dir, names);
        }
        let manifest = dir.join(ResourceFile::Order);
        if self.options.destructive && manifest.is_file() {
            self.remove(&manifest);
        }
        Ok(())
    }

    fn remove(&mut self, path: &Path) {
        tracing::debug!(path = %path.display(), "Removing stale entry");
        if io::remove_all(path) {
            self.removed += 1;
        }
    }
}

/// Entry names of `dir` other than `reserved` files and `keep`.
fn stale_entries(
    dir: &Path,
    reserved: &[ResourceFile],
    keep: &HashSet<String>,
) -> Result<Vec<String>> {
    Ok(io::list_dir(dir)?
        .into_iter()
        .map(|e| e.name)
        .filter(|name| {
            ResourceFile::from_name(name).is_none_or(|f| !reserved.contains(&f))
                && !keep.contains(name)
        })
        .collect())
}

/// The part of the model that goes to disk: configuration attributes when
/// metadata is known, the whole model otherwise. Keys shadowing a child type
/// are dropped.
fn persisted_model(resource: &Resource, registration: Option<&dyn Registration>) -> Model {
    let model = resource.model();
    match registration {
        Some(reg) if resource.is_model_defined() => model
            .iter()
            .filter(|(name, _)| {
                !resource.has_child_type(name) && is_config_attribute(Some(reg), name)
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
        _ => model.clone(),
    }
}
