//! Directory codec for management resource trees
//!
//! Persists a [`mgmt_model::Resource`] tree as a directory hierarchy and
//! reads it back:
//!
//! ```text
//! root/
//! ├── attributes.dmr          configuration attributes (JSON object)
//! ├── order.txt               optional type order
//! └── subsystem/              one directory per child type
//!     ├── order.txt           optional child order
//!     └── logging/            one directory per child, name escaped
//!         └── attributes.dmr
//! ```
//!
//! Child names are escaped with [`escape::encode`] so any name maps to a
//! single safe path component.

pub mod attributes;
pub mod config;
pub mod constants;
pub mod error;
pub mod escape;
pub mod io;
pub mod order;
pub mod persist;
pub mod read;

pub use attributes::{read_resource_file, write_resource_file};
pub use config::{ConfigFormat, ConfigStore};
pub use constants::ResourceFile;
pub use error::{Error, Result};
pub use io::{DirEntry, remove_all};
pub use order::list_ordered_dirs;
pub use persist::{PersistOptions, persist};
pub use read::{check_files, read_resource};
