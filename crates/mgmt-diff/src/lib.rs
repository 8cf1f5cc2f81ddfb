//! Resource tree diffing for management-model persistence
//!
//! Compares a live [`mgmt_model::Resource`] tree with a target tree or a
//! persisted directory and produces ordered [`ResourceDiff`] records, which
//! translate into [`Operation`] requests for an executor:
//!
//! ```text
//! actual ─┐
//!         ├─ engine::diff_* ─> Vec<ResourceDiff> ─> to_operations ─> Vec<Operation>
//! target ─┘   (Resource | DirTarget)
//! ```

pub mod engine;
pub mod error;
pub mod operation;
pub mod record;

pub use engine::{DiffOptions, DiffTarget, DirTarget, add_all, diff, diff_dir, diff_with_registration};
pub use error::{Error, Result};
pub use operation::Operation;
pub use record::{ResourceDiff, to_operations};
