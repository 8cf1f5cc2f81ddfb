//! Operation execution and persistence orchestration
//!
//! This crate ties the tree model, the directory codec and the diff engine
//! together:
//!
//! - **Executors**: [`OperationExecutor`] and the in-memory [`ModelExecutor`]
//! - **Handlers**: [`persist_to_fs`] and [`sync_with_fs`]
//! - **Persister**: [`FsTreePersister`], boot-gated store and load of a
//!   persisted root plus any additional roots
//! - **Configuration**: [`PersistenceConfig`]
//!
//! # Architecture
//!
//! ```text
//!              mgmt-cli
//!                 |
//!             mgmt-core
//!                 |
//!            mgmt-diff
//!             /      \
//!       mgmt-fs ---- mgmt-model
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod handlers;
pub mod persister;

pub use config::{HOST, PersistenceConfig};
pub use error::{Error, Result};
pub use executor::{ModelExecutor, OperationExecutor};
pub use handlers::{
    PERSIST_TO_FS, SYNC_WITH_FS, SyncOptions, SyncReport, persist_to_fs, sync_with_fs,
    sync_with_fs_options,
};
pub use persister::{FsTreePersister, PendingStore, read_host_name};
