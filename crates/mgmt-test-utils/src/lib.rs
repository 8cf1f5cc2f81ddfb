//! Shared test fixtures for the management persistence workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TreeBuilder`] and the [`model`] helper for in-memory trees
//! - [`dir`]: [`TestDir`] scratch directories and structural assertions

pub mod dir;
pub mod tree;

pub use dir::{TestDir, assert_no_types, assert_persisted, assert_read, assert_resources_equal};
pub use tree::{TreeBuilder, model, server_registration, server_tree};
