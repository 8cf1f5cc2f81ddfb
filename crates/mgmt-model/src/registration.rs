//! Registration metadata consumed by persistence and diffing
//!
//! A [`Registration`] describes one position of the resource tree: which
//! attributes are configuration (persisted) and which are runtime-only, how
//! child positions are registered, and whether the resource itself may be
//! persisted or created standalone.

use serde::{Deserialize, Serialize};

use crate::PathElement;

/// Child name matching any name of a type.
pub const WILDCARD: &str = "*";

/// Storage kind of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeStorage {
    /// Persistent configuration state
    Configuration,
    /// Computed live, never persisted
    Runtime,
}

/// Metadata for one position of the resource tree.
pub trait Registration {
    /// Alias registrations point at another resource and are not persisted.
    fn is_alias(&self) -> bool;

    /// Remote registrations live in another process and are not persisted.
    fn is_remote(&self) -> bool;

    /// Runtime-only registrations have no persistent state.
    fn is_runtime_only(&self) -> bool;

    /// Declared attribute names, in declaration order.
    fn attribute_names(&self) -> Vec<&str>;

    /// Storage kind of `name`, `None` if the attribute is not declared.
    fn attribute_storage(&self, name: &str) -> Option<AttributeStorage>;

    /// Registration of the child position `element`.
    fn sub_model(&self, element: &PathElement) -> Option<&dyn Registration>;

    /// True if resources at this position can be created with an `add`
    /// operation.
    fn has_add_operation(&self) -> bool;
}

/// True if the registration allows persistence.
pub fn is_registration_persistent(registration: &dyn Registration) -> bool {
    !registration.is_alias() && !registration.is_remote() && !registration.is_runtime_only()
}

/// True if `name` is a configuration attribute. Without metadata every
/// attribute counts as configuration.
pub fn is_config_attribute(registration: Option<&dyn Registration>, name: &str) -> bool {
    match registration {
        None => true,
        Some(reg) => reg.attribute_storage(name) == Some(AttributeStorage::Configuration),
    }
}

/// In-memory [`Registration`] assembled with a builder.
///
/// # Example
///
/// ```
/// use mgmt_model::{AttributeStorage, PathElement, Registration, ResourceRegistration};
///
/// let reg = ResourceRegistration::new()
///     .configuration("port")
///     .runtime_attribute("bound")
///     .wildcard_child("listener", ResourceRegistration::new().configuration("name"));
///
/// assert_eq!(reg.attribute_storage("port"), Some(AttributeStorage::Configuration));
/// assert!(reg.sub_model(&PathElement::new("listener", "http")).is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ResourceRegistration {
    attributes: Vec<(String, AttributeStorage)>,
    children: Vec<(PathElement, ResourceRegistration)>,
    alias: bool,
    remote: bool,
    runtime_only: bool,
    add_operation: bool,
}

impl Default for ResourceRegistration {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceRegistration {
    /// A persistable registration with an `add` operation and no attributes.
    pub fn new() -> Self {
        Self {
            attributes: Vec::new(),
            children: Vec::new(),
            alias: false,
            remote: false,
            runtime_only: false,
            add_operation: true,
        }
    }

    /// Declare an attribute. Redeclaring replaces the storage kind.
    pub fn attribute(mut self, name: impl Into<String>, storage: AttributeStorage) -> Self {
        let name = name.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = storage,
            None => self.attributes.push((name, storage)),
        }
        self
    }

    pub fn configuration(self, name: impl Into<String>) -> Self {
        self.attribute(name, AttributeStorage::Configuration)
    }

    pub fn runtime_attribute(self, name: impl Into<String>) -> Self {
        self.attribute(name, AttributeStorage::Runtime)
    }

    /// Register a child position. `element.value` may be [`WILDCARD`].
    pub fn child(mut self, element: PathElement, registration: ResourceRegistration) -> Self {
        self.children.retain(|(e, _)| *e != element);
        self.children.push((element, registration));
        self
    }

    /// Register every child of `child_type`.
    pub fn wildcard_child(
        self,
        child_type: impl Into<String>,
        registration: ResourceRegistration,
    ) -> Self {
        self.child(PathElement::new(child_type, WILDCARD), registration)
    }

    pub fn alias(mut self) -> Self {
        self.alias = true;
        self
    }

    pub fn remote(mut self) -> Self {
        self.remote = true;
        self
    }

    pub fn runtime_only(mut self) -> Self {
        self.runtime_only = true;
        self
    }

    /// Mark the position as not creatable through `add`.
    pub fn without_add(mut self) -> Self {
        self.add_operation = false;
        self
    }
}

impl Registration for ResourceRegistration {
    fn is_alias(&self) -> bool {
        self.alias
    }

    fn is_remote(&self) -> bool {
        self.remote
    }

    fn is_runtime_only(&self) -> bool {
        self.runtime_only
    }

    fn attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|(n, _)| n.as_str()).collect()
    }

    fn attribute_storage(&self, name: &str) -> Option<AttributeStorage> {
        self.attributes
            .iter()
            .find_map(|(n, storage)| (n == name).then_some(*storage))
    }

    fn sub_model(&self, element: &PathElement) -> Option<&dyn Registration> {
        let exact = self.children.iter().find(|(e, _)| e == element);
        let found = exact.or_else(|| {
            self.children
                .iter()
                .find(|(e, _)| e.key == element.key && e.value == WILDCARD)
        });
        found.map(|(_, reg)| reg as &dyn Registration)
    }

    fn has_add_operation(&self) -> bool {
        self.add_operation
    }
}
