//! Boot-time persister for a directory-backed management tree
//!
//! [`FsTreePersister`] owns one persisted root directory. At boot,
//! [`FsTreePersister::load`] turns the directory into the operation list
//! that brings an empty (or partially built) live tree in line with it.
//! Once boot has succeeded, every store writes the live tree back.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use mgmt_diff::{
    DiffOptions, DirTarget, Operation, ResourceDiff, add_all, diff_with_registration,
    to_operations,
};
use mgmt_fs::{PersistOptions, persist, read_resource_file};
use mgmt_model::{PathAddress, PathElement, Registration, Resource};

use crate::config::{HOST, PersistenceConfig};
use crate::Result;

/// Attribute of a persisted host root holding the host name
pub const NAME: &str = "name";

/// Directory-backed configuration persister.
#[derive(Debug)]
pub struct FsTreePersister {
    root: PathBuf,
    prefix: Option<PathElement>,
    first_operations: Vec<Operation>,
    persist_options: PersistOptions,
    diff_options: DiffOptions,
    additional_roots: Mutex<Vec<(PathElement, PathBuf)>>,
    booted: AtomicBool,
}

impl FsTreePersister {
    /// Persister for `root` that skips the `host` type.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_config(&PersistenceConfig::new(root))
    }

    pub fn from_config(config: &PersistenceConfig) -> Self {
        Self {
            root: config.root.clone(),
            prefix: config.prefix.clone(),
            first_operations: Vec::new(),
            persist_options: config.persist_options(),
            diff_options: config.diff_options(),
            additional_roots: Mutex::new(Vec::new()),
            booted: AtomicBool::new(false),
        }
    }

    /// Address element the persisted root corresponds to.
    pub fn with_prefix(mut self, prefix: PathElement) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// Operations returned ahead of the diff on every load.
    pub fn with_first_operations(mut self, operations: Vec<Operation>) -> Self {
        self.first_operations = operations;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn skip_types(&self) -> &HashSet<String> {
        &self.diff_options.skip_types
    }

    /// Address operations produced by [`load`](Self::load) start from.
    pub fn address(&self) -> PathAddress {
        match &self.prefix {
            Some(prefix) => PathAddress::root().append(prefix.clone()),
            None => PathAddress::root(),
        }
    }

    /// Register another persisted tree to be loaded under `element`.
    pub fn register_additional_root(&self, element: PathElement, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        tracing::debug!(%element, dir = %dir.display(), "Registered additional root");
        self.additional_roots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((element, dir));
    }

    pub fn successful_boot(&self) {
        self.booted.store(true, Ordering::SeqCst);
    }

    pub fn is_booted(&self) -> bool {
        self.booted.load(Ordering::SeqCst)
    }

    /// Prepare writing `resource` back to the root directory.
    ///
    /// Before [`successful_boot`](Self::successful_boot) the returned store
    /// does nothing, so the boot operations never rewrite the tree they were
    /// read from.
    pub fn store<'a>(
        &'a self,
        resource: &'a Resource,
        registration: Option<&'a dyn Registration>,
    ) -> PendingStore<'a> {
        let target = self.is_booted().then_some(StoreTarget {
            resource,
            registration,
            dir: &self.root,
            options: &self.persist_options,
        });
        PendingStore { target }
    }

    /// Operations that bring `resource` in line with the persisted tree:
    /// first operations, then the diff of the root directory, then each
    /// additional root in registration order.
    ///
    /// A root directory that does not exist yet contributes nothing.
    pub fn load(
        &self,
        resource: &Resource,
        registration: Option<&dyn Registration>,
    ) -> Result<Vec<Operation>> {
        let address = self.address();
        let mut records: Vec<ResourceDiff> = Vec::new();

        if self.root.is_dir() {
            records.extend(diff_with_registration(
                registration,
                &address,
                resource,
                &DirTarget::new(&self.root),
                &self.diff_options,
            )?);
        } else {
            tracing::debug!(root = %self.root.display(), "No persisted tree yet");
        }

        let additional = self
            .additional_roots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let nested_options = DiffOptions {
            skip_types: HashSet::new(),
            ..self.diff_options.clone()
        };
        for (element, dir) in additional {
            let child_address = address.append(element.clone());
            let child_registration = registration.and_then(|r| r.sub_model(&element));
            let target = DirTarget::new(dir);
            let child_records = match resource.child_at(&element) {
                Some(live) => diff_with_registration(
                    child_registration,
                    &child_address,
                    live,
                    &target,
                    &nested_options,
                )?,
                None => add_all(child_registration, &child_address, &target, &nested_options)?,
            };
            records.extend(child_records);
        }

        let mut operations = self.first_operations.clone();
        operations.extend(to_operations(&records)?);
        for operation in &operations {
            tracing::debug!(%operation, "Boot operation");
        }
        tracing::info!(
            root = %self.root.display(),
            operations = operations.len(),
            "Loaded persisted configuration"
        );
        Ok(operations)
    }
}

struct StoreTarget<'a> {
    resource: &'a Resource,
    registration: Option<&'a dyn Registration>,
    dir: &'a Path,
    options: &'a PersistOptions,
}

/// A store waiting to be committed or rolled back.
pub struct PendingStore<'a> {
    target: Option<StoreTarget<'a>>,
}

impl PendingStore<'_> {
    /// True when committing would not write anything.
    pub fn is_noop(&self) -> bool {
        self.target.is_none()
    }

    pub fn commit(self) -> Result<()> {
        let Some(target) = self.target else {
            return Ok(());
        };
        persist(target.resource, target.registration, target.dir, target.options)?;
        Ok(())
    }

    pub fn rollback(self) {
        if let Some(target) = self.target {
            tracing::debug!(dir = %target.dir.display(), "Store rolled back");
        }
    }
}

/// Host name recorded in a persisted host root.
pub fn read_host_name(dir: &Path) -> Result<String> {
    let attributes = read_resource_file(dir)?;
    match attributes.get(NAME) {
        Some(serde_json::Value::String(name)) => Ok(name.clone()),
        Some(value) if !value.is_null() => Ok(value.to_string()),
        _ => Err(mgmt_fs::Error::illegal_state(format!(
            "{NAME} is missing among the {HOST} attributes in {}",
            dir.display()
        ))
        .into()),
    }
}
