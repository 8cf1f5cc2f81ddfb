//! Structural diff between a live resource tree and a target
//!
//! The target is either another in-memory [`Resource`] or a persisted
//! directory. Both go through one walk over the [`DiffTarget`] trait; a
//! directory target is read lazily, one resource directory at a time.
//!
//! Records come out in replay order: an added parent precedes its added
//! descendants, a removed child precedes its removed ancestors, and a
//! resource's attribute write precedes any record for its children.

use std::borrow::Cow;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use mgmt_fs::{ResourceFile, check_files, escape, list_ordered_dirs, read_resource_file};
use mgmt_model::{
    Model, ModelValue, PathAddress, PathElement, Registration, Resource, is_config_attribute,
    is_persistent, is_registration_persistent,
};

use crate::record::ResourceDiff;
use crate::{Error, Result};

static UNDEFINED: ModelValue = ModelValue::Null;

/// Options for a diff walk.
#[derive(Debug, Clone, Default)]
pub struct DiffOptions {
    /// Treat a child without registration as unregistered instead of failing
    pub ignore_missing_child_registration: bool,
    /// Child types of the root that are left out of the diff
    pub skip_types: HashSet<String>,
}

impl DiffOptions {
    pub fn ignore_missing_child_registration(mut self) -> Self {
        self.ignore_missing_child_registration = true;
        self
    }

    pub fn skip_type(mut self, child_type: impl Into<String>) -> Self {
        self.skip_types.insert(child_type.into());
        self
    }
}

/// The side of a diff that the live tree is brought to.
pub trait DiffTarget: Sized {
    fn model(&self) -> Result<Cow<'_, Model>>;

    /// Child types in iteration order.
    fn child_types(&self) -> Result<Vec<String>>;

    /// Children of `child_type` as `(name, child)` pairs, in iteration order.
    fn children(&self, child_type: &str) -> Result<Vec<(String, Self)>>;

    /// False for targets that must never be added.
    fn is_persistent(&self) -> bool {
        true
    }
}

impl<'a> DiffTarget for &'a Resource {
    fn model(&self) -> Result<Cow<'_, Model>> {
        Ok(Cow::Borrowed(Resource::model(*self)))
    }

    fn child_types(&self) -> Result<Vec<String>> {
        Ok(Resource::child_types(*self).map(str::to_owned).collect())
    }

    fn children(&self, child_type: &str) -> Result<Vec<(String, Self)>> {
        let resource: &'a Resource = *self;
        Ok(resource
            .children(child_type)
            .map(|(name, child)| (name.to_owned(), child))
            .collect())
    }

    fn is_persistent(&self) -> bool {
        is_persistent(*self, None)
    }
}

/// A persisted resource directory used as a diff target.
#[derive(Debug, Clone)]
pub struct DirTarget {
    dir: PathBuf,
}

impl DirTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }
}

impl DiffTarget for DirTarget {
    fn model(&self) -> Result<Cow<'_, Model>> {
        Ok(Cow::Owned(read_resource_file(&self.dir)?))
    }

    fn child_types(&self) -> Result<Vec<String>> {
        check_files(&self.dir, &ResourceFile::ALL)?;
        list_ordered_dirs(&self.dir)?
            .into_iter()
            .map(|entry| -> Result<String> { Ok(escape::decode(&entry.name)?.into_owned()) })
            .collect()
    }

    fn children(&self, child_type: &str) -> Result<Vec<(String, Self)>> {
        let type_dir = self.dir.join(&*escape::encode(child_type));
        if !type_dir.is_dir() {
            return Ok(Vec::new());
        }
        check_files(&type_dir, &[ResourceFile::Order])?;
        list_ordered_dirs(&type_dir)?
            .into_iter()
            .map(|entry| -> Result<(String, Self)> {
                let name = escape::decode(&entry.name)?.into_owned();
                Ok((name, DirTarget::new(entry.path)))
            })
            .collect()
    }
}

/// Diff two in-memory trees without metadata.
pub fn diff(actual: &Resource, target: &Resource) -> Result<Vec<ResourceDiff>> {
    diff_with_registration(
        None,
        &PathAddress::root(),
        actual,
        &target,
        &DiffOptions::default(),
    )
}

/// Diff a live tree against a persisted directory.
pub fn diff_dir(
    registration: Option<&dyn Registration>,
    address: &PathAddress,
    actual: &Resource,
    dir: &Path,
    options: &DiffOptions,
) -> Result<Vec<ResourceDiff>> {
    if !dir.is_dir() {
        return Err(mgmt_fs::Error::invalid_argument(format!(
            "{} is not a directory",
            dir.display()
        ))
        .into());
    }
    diff_with_registration(registration, address, actual, &DirTarget::new(dir), options)
}

/// Diff `actual`, located at `address`, against `target`.
///
/// # Errors
///
/// - [`Error::ChildRegistrationMissing`] when metadata has no entry for a
///   child, unless tolerated through [`DiffOptions`]
/// - [`Error::InconsistentModel`] when, without metadata, one side defines
///   an attribute the other side has no key for (a `null` value counts as
///   absent)
pub fn diff_with_registration<T: DiffTarget>(
    registration: Option<&dyn Registration>,
    address: &PathAddress,
    actual: &Resource,
    target: &T,
    options: &DiffOptions,
) -> Result<Vec<ResourceDiff>> {
    let mut walk = DiffWalk {
        options,
        records: Vec::new(),
    };
    walk.diff_node(registration, address, actual, target, &options.skip_types)?;
    tracing::debug!(%address, records = walk.records.len(), "Diff finished");
    Ok(walk.records)
}

/// Records that create `target` and its whole subtree at `address`.
pub fn add_all<T: DiffTarget>(
    registration: Option<&dyn Registration>,
    address: &PathAddress,
    target: &T,
    options: &DiffOptions,
) -> Result<Vec<ResourceDiff>> {
    let mut walk = DiffWalk {
        options,
        records: Vec::new(),
    };
    walk.add_sweep(registration, address, target)?;
    Ok(walk.records)
}

enum ChildRegistration<'r> {
    Skip,
    Use(Option<&'r dyn Registration>),
}

struct DiffWalk<'o> {
    options: &'o DiffOptions,
    records: Vec<ResourceDiff>,
}

impl DiffWalk<'_> {
    fn emit(&mut self, record: ResourceDiff) {
        tracing::debug!(?record, "Diff record");
        self.records.push(record);
    }

    fn child_registration<'r>(
        &self,
        registration: Option<&'r dyn Registration>,
        element: &PathElement,
        address: &PathAddress,
    ) -> Result<ChildRegistration<'r>> {
        let Some(registration) = registration else {
            return Ok(ChildRegistration::Use(None));
        };
        match registration.sub_model(element) {
            Some(sub) if is_registration_persistent(sub) => Ok(ChildRegistration::Use(Some(sub))),
            Some(_) => Ok(ChildRegistration::Skip),
            None if self.options.ignore_missing_child_registration => {
                Ok(ChildRegistration::Use(None))
            }
            None => Err(Error::ChildRegistrationMissing {
                address: address.to_string(),
            }),
        }
    }

    fn diff_node<T: DiffTarget>(
        &mut self,
        registration: Option<&dyn Registration>,
        address: &PathAddress,
        actual: &Resource,
        target: &T,
        skip_types: &HashSet<String>,
    ) -> Result<()> {
        let target_model = target.model()?;
        self.diff_attributes(registration, address, actual.model(), &target_model)?;

        let no_skip = HashSet::new();
        let mut target_types: Vec<String> = target
            .child_types()?
            .into_iter()
            .filter(|t| !skip_types.contains(t))
            .collect();

        for child_type in actual.child_types() {
            if skip_types.contains(child_type) {
                continue;
            }
            let Some(pos) = target_types.iter().position(|t| t == child_type) else {
                for (name, child) in actual.children(child_type) {
                    if !is_persistent(child, None) {
                        continue;
                    }
                    let element = PathElement::new(child_type, name);
                    let child_address = address.append(element.clone());
                    if let ChildRegistration::Use(reg) =
                        self.child_registration(registration, &element, &child_address)?
                    {
                        self.remove_sweep(reg, &child_address, child)?;
                    }
                }
                continue;
            };
            target_types.remove(pos);

            let mut target_children = target.children(child_type)?;
            for (name, child) in actual.children(child_type) {
                if !is_persistent(child, None) {
                    continue;
                }
                let element = PathElement::new(child_type, name);
                let child_address = address.append(element.clone());
                let ChildRegistration::Use(reg) =
                    self.child_registration(registration, &element, &child_address)?
                else {
                    continue;
                };
                match target_children.iter().position(|(n, _)| n == name) {
                    Some(idx) => {
                        let (_, target_child) = target_children.remove(idx);
                        self.diff_node(reg, &child_address, child, &target_child, &no_skip)?;
                    }
                    None => self.remove_sweep(reg, &child_address, child)?,
                }
            }

            for (name, target_child) in target_children {
                self.add_child(registration, address, child_type, &name, &target_child)?;
            }
        }

        for child_type in target_types {
            for (name, target_child) in target.children(&child_type)? {
                self.add_child(registration, address, &child_type, &name, &target_child)?;
            }
        }
        Ok(())
    }

    fn diff_attributes(
        &mut self,
        registration: Option<&dyn Registration>,
        address: &PathAddress,
        actual: &Model,
        target: &Model,
    ) -> Result<()> {
        if actual == target {
            return Ok(());
        }

        let mut changed = Model::new();
        match registration {
            Some(reg) => {
                for name in reg.attribute_names() {
                    if !is_config_attribute(Some(reg), name) {
                        continue;
                    }
                    let actual_value = actual.get(name).unwrap_or(&UNDEFINED);
                    let target_value = target.get(name).unwrap_or(&UNDEFINED);
                    if actual_value != target_value {
                        changed.insert(name.to_owned(), target_value.clone());
                    }
                }
            }
            None => {
                let one_sided = |from: &Model, other: &Model| {
                    from.iter().any(|(k, v)| !v.is_null() && !other.contains_key(k))
                };
                if one_sided(actual, target) || one_sided(target, actual) {
                    return Err(Error::InconsistentModel {
                        address: address.to_string(),
                        actual: actual.keys().cloned().collect(),
                        target: target.keys().cloned().collect(),
                    });
                }
                for (name, actual_value) in actual {
                    let target_value = target.get(name).unwrap_or(&UNDEFINED);
                    if actual_value != target_value {
                        changed.insert(name.clone(), target_value.clone());
                    }
                }
            }
        }

        if !changed.is_empty() {
            self.emit(ResourceDiff::WriteAttribute {
                address: address.clone(),
                attributes: changed,
            });
        }
        Ok(())
    }

    fn add_child<T: DiffTarget>(
        &mut self,
        registration: Option<&dyn Registration>,
        parent: &PathAddress,
        child_type: &str,
        name: &str,
        target: &T,
    ) -> Result<()> {
        if !target.is_persistent() {
            return Ok(());
        }
        let element = PathElement::new(child_type, name);
        let child_address = parent.append(element.clone());
        match self.child_registration(registration, &element, &child_address)? {
            ChildRegistration::Use(reg) => self.add_sweep(reg, &child_address, target),
            ChildRegistration::Skip => Ok(()),
        }
    }

    fn add_sweep<T: DiffTarget>(
        &mut self,
        registration: Option<&dyn Registration>,
        address: &PathAddress,
        target: &T,
    ) -> Result<()> {
        if registration.is_some_and(|reg| !reg.has_add_operation()) {
            tracing::debug!(%address, "No add operation, skipping subtree");
            return Ok(());
        }

        let attributes: Model = target
            .model()?
            .iter()
            .filter(|(name, value)| !value.is_null() && is_config_attribute(registration, name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        self.emit(ResourceDiff::AddResource {
            address: address.clone(),
            attributes,
        });

        for child_type in target.child_types()? {
            for (name, child) in target.children(&child_type)? {
                self.add_child(registration, address, &child_type, &name, &child)?;
            }
        }
        Ok(())
    }

    fn remove_sweep(
        &mut self,
        registration: Option<&dyn Registration>,
        address: &PathAddress,
        actual: &Resource,
    ) -> Result<()> {
        for child_type in actual.child_types() {
            for (name, child) in actual.children(child_type) {
                if !is_persistent(child, None) {
                    continue;
                }
                let element = PathElement::new(child_type, name);
                let child_address = address.append(element.clone());
                if let ChildRegistration::Use(reg) =
                    self.child_registration(registration, &element, &child_address)?
                {
                    self.remove_sweep(reg, &child_address, child)?;
                }
            }
        }
        self.emit(ResourceDiff::RemoveResource {
            address: address.clone(),
        });
        Ok(())
    }
}
