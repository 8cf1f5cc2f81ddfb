//! Resource tree model for management-model persistence
//!
//! Provides the in-memory side of the persistence engine:
//!
//! - **Resource**: a node with an attribute model and ordered, typed children
//! - **PathAddress**: absolute location of a resource as (type, name) pairs
//! - **Registration**: metadata telling which attributes are configuration and
//!   which resources are excluded from persistence
//!
//! Attribute values are `serde_json::Value`; `null` plays the role of an
//! undefined value.

pub mod address;
pub mod error;
pub mod registration;
pub mod resource;

pub use address::{PathAddress, PathElement};
pub use error::{Error, Result};
pub use registration::{
    AttributeStorage, Registration, ResourceRegistration, WILDCARD, is_config_attribute,
    is_registration_persistent,
};
pub use resource::{Resource, is_persistent};

/// Attribute value. `Value::Null` is an undefined value.
pub type ModelValue = serde_json::Value;

/// Insertion-ordered attribute map of a resource.
pub type Model = serde_json::Map<String, ModelValue>;
