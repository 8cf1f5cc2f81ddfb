//! Persistence configuration
//!
//! Loaded from a TOML, JSON or YAML file through [`mgmt_fs::ConfigStore`]:
//!
//! ```toml
//! root = "/var/lib/server/config"
//! write_order_files = true
//!
//! [prefix]
//! key = "host"
//! value = "primary"
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use mgmt_diff::DiffOptions;
use mgmt_fs::{ConfigStore, PersistOptions};
use mgmt_model::PathElement;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Child type of the root that persistence leaves alone by default
pub const HOST: &str = "host";

fn default_true() -> bool {
    true
}

fn default_ignore_types() -> Vec<String> {
    vec![HOST.to_string()]
}

/// Settings for persisting and loading a managed tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Directory holding the persisted tree
    pub root: PathBuf,

    /// Remove directory entries with no counterpart in the tree
    #[serde(default = "default_true")]
    pub destructive: bool,

    /// Child types of the root that are neither persisted nor diffed
    #[serde(default = "default_ignore_types")]
    pub ignore_types: Vec<String>,

    /// Treat children without metadata as unregistered while loading
    #[serde(default = "default_true")]
    pub ignore_missing_child_registration: bool,

    /// Record type and child order in `order.txt` manifests
    #[serde(default)]
    pub write_order_files: bool,

    /// Address element the persisted root corresponds to
    #[serde(default)]
    pub prefix: Option<PathElement>,
}

impl PersistenceConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            destructive: true,
            ignore_types: default_ignore_types(),
            ignore_missing_child_registration: true,
            write_order_files: false,
            prefix: None,
        }
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = ConfigStore::new().load(path)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), root = %config.root.display(), "Loaded persistence config");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        ConfigStore::new().save(path, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(Error::Config {
                message: "root directory is empty".into(),
            });
        }
        if let Some(prefix) = &self.prefix {
            if prefix.key.trim().is_empty() || prefix.value.trim().is_empty() {
                return Err(Error::Config {
                    message: format!("prefix '{prefix}' has a blank type or name"),
                });
            }
        }
        if let Some(blank) = self.ignore_types.iter().find(|t| t.trim().is_empty()) {
            return Err(Error::Config {
                message: format!("blank ignored type '{blank}'"),
            });
        }
        Ok(())
    }

    pub fn ignore_type_set(&self) -> HashSet<String> {
        self.ignore_types.iter().cloned().collect()
    }

    pub fn persist_options(&self) -> PersistOptions {
        PersistOptions {
            destructive: self.destructive,
            ignore_types: self.ignore_type_set(),
            write_order_files: self.write_order_files,
        }
    }

    pub fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            ignore_missing_child_registration: self.ignore_missing_child_registration,
            skip_types: self.ignore_type_set(),
        }
    }
}
