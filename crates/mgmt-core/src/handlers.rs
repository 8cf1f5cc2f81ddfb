//! `persist-to-fs` and `sync-with-fs` handlers

use std::path::Path;

use mgmt_diff::{DiffOptions, Operation, diff_dir, to_operations};
use mgmt_fs::{PersistOptions, persist};
use mgmt_model::{PathAddress, Registration, Resource, is_persistent};

use crate::Result;
use crate::executor::OperationExecutor;

/// Operation name of [`persist_to_fs`]
pub const PERSIST_TO_FS: &str = "persist-to-fs";

/// Operation name of [`sync_with_fs`]
pub const SYNC_WITH_FS: &str = "sync-with-fs";

/// Result of a sync run
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    /// Whether every operation was applied
    pub success: bool,
    /// Actions taken, in order
    pub actions: Vec<String>,
    /// Operations handed to the executor successfully
    pub applied: Vec<Operation>,
    /// Errors encountered
    pub errors: Vec<String>,
}

impl SyncReport {
    pub fn success() -> Self {
        Self {
            success: true,
            actions: Vec::new(),
            applied: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: String) -> Self {
        self.actions.push(action);
        self
    }

    fn fail(&mut self, error: String) {
        self.success = false;
        self.errors.push(error);
    }
}

/// Options for [`sync_with_fs_options`]
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Compute the operations without executing them.
    /// Actions are prefixed with "[dry-run] Would apply"
    pub dry_run: bool,
    pub diff: DiffOptions,
}

/// Persist `resource` into `dir`, destructively.
///
/// Returns `false` without touching the directory when the resource is not
/// persistable.
pub fn persist_to_fs(
    resource: &Resource,
    registration: Option<&dyn Registration>,
    dir: &Path,
) -> Result<bool> {
    if !is_persistent(resource, registration) {
        tracing::debug!(dir = %dir.display(), "Resource is not persistent, nothing to write");
        return Ok(false);
    }
    persist(resource, registration, dir, &PersistOptions::default())?;
    Ok(true)
}

/// Bring the live `resource`, located at `address`, in line with the tree
/// persisted in `dir` by handing every diff operation to `executor`.
pub fn sync_with_fs<E>(
    executor: &mut E,
    resource: &Resource,
    registration: Option<&dyn Registration>,
    address: &PathAddress,
    dir: &Path,
) -> Result<SyncReport>
where
    E: OperationExecutor + ?Sized,
{
    sync_with_fs_options(
        executor,
        resource,
        registration,
        address,
        dir,
        &SyncOptions::default(),
    )
}

/// [`sync_with_fs`] with options.
///
/// Diff failures are returned as errors. An operation rejected by the
/// executor stops the run; the report records the failure and lists only
/// what was applied before it.
pub fn sync_with_fs_options<E>(
    executor: &mut E,
    resource: &Resource,
    registration: Option<&dyn Registration>,
    address: &PathAddress,
    dir: &Path,
    options: &SyncOptions,
) -> Result<SyncReport>
where
    E: OperationExecutor + ?Sized,
{
    let mut report = SyncReport::success();
    if !is_persistent(resource, registration) {
        return Ok(report.with_action("Resource is not persistent - nothing to sync".to_string()));
    }

    let records = diff_dir(registration, address, resource, dir, &options.diff)?;
    let operations = to_operations(&records)?;
    if operations.is_empty() {
        return Ok(report.with_action("Already in sync".to_string()));
    }

    for operation in operations {
        if options.dry_run {
            report.actions.push(format!("[dry-run] Would apply {operation}"));
            continue;
        }
        match executor.execute(&operation) {
            Ok(()) => {
                report.actions.push(format!("Applied {operation}"));
                report.applied.push(operation);
            }
            Err(e) => {
                tracing::warn!(%operation, error = %e, "Sync stopped");
                report.fail(format!("{operation}: {e}"));
                break;
            }
        }
    }

    tracing::info!(
        dir = %dir.display(),
        applied = report.applied.len(),
        success = report.success,
        "Synchronized with directory"
    );
    Ok(report)
}
