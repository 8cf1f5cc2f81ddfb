//! In-memory resource tree

use crate::registration::{Registration, is_registration_persistent};
use crate::{Error, Model, PathAddress, PathElement, Result};

/// A node of the management resource tree.
///
/// A resource owns its attribute [`Model`] and its children, grouped by child
/// type. Types and children keep insertion order; within a type, names are
/// unique. Types without children are not kept, so [`Resource::child_types`]
/// only yields types that have at least one child.
///
/// `proxy` and `runtime` resources are transient: they are never persisted
/// and never diffed.
#[derive(Debug, Clone, Default)]
pub struct Resource {
    model: Model,
    children: Vec<ChildType>,
    proxy: bool,
    runtime: bool,
}

#[derive(Debug, Clone)]
struct ChildType {
    name: String,
    entries: Vec<(String, Resource)>,
}

impl ChildType {
    fn get(&self, name: &str) -> Option<&Resource> {
        self.entries
            .iter()
            .find_map(|(n, r)| (n == name).then_some(r))
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Resource> {
        self.entries
            .iter_mut()
            .find_map(|(n, r)| (n == name).then_some(r))
    }
}

impl Resource {
    /// Create an empty resource with an undefined model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resource carrying `model`.
    pub fn with_model(model: Model) -> Self {
        Self {
            model,
            ..Self::default()
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    /// Replace the whole attribute model.
    pub fn write_model(&mut self, model: Model) {
        self.model = model;
    }

    /// True if the model holds at least one attribute.
    pub fn is_model_defined(&self) -> bool {
        !self.model.is_empty()
    }

    pub fn is_proxy(&self) -> bool {
        self.proxy
    }

    pub fn is_runtime(&self) -> bool {
        self.runtime
    }

    pub fn set_proxy(&mut self, proxy: bool) {
        self.proxy = proxy;
    }

    pub fn set_runtime(&mut self, runtime: bool) {
        self.runtime = runtime;
    }

    /// Child types in insertion order.
    pub fn child_types(&self) -> impl Iterator<Item = &str> + '_ {
        self.children.iter().map(|t| t.name.as_str())
    }

    pub fn has_child_type(&self, child_type: &str) -> bool {
        self.type_entry(child_type).is_some()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Names of the children of `child_type`, in insertion order.
    pub fn children_names<'a>(&'a self, child_type: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.type_entry(child_type)
            .into_iter()
            .flat_map(|t| t.entries.iter().map(|(name, _)| name.as_str()))
    }

    /// Children of `child_type` as `(name, resource)` pairs.
    pub fn children<'a>(
        &'a self,
        child_type: &str,
    ) -> impl Iterator<Item = (&'a str, &'a Resource)> + use<'a> {
        self.type_entry(child_type)
            .into_iter()
            .flat_map(|t| t.entries.iter().map(|(name, res)| (name.as_str(), res)))
    }

    pub fn child(&self, child_type: &str, name: &str) -> Option<&Resource> {
        self.type_entry(child_type)?.get(name)
    }

    pub fn child_mut(&mut self, child_type: &str, name: &str) -> Option<&mut Resource> {
        self.children
            .iter_mut()
            .find(|t| t.name == child_type)?
            .get_mut(name)
    }

    /// Child addressed by a single path element.
    pub fn child_at(&self, element: &PathElement) -> Option<&Resource> {
        self.child(&element.key, &element.value)
    }

    /// Register `child` under `child_type`/`name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateChild`] if the name is already taken within
    /// the type.
    pub fn register_child(
        &mut self,
        child_type: impl Into<String>,
        name: impl Into<String>,
        child: Resource,
    ) -> Result<&mut Resource> {
        let child_type = child_type.into();
        let name = name.into();

        let idx = match self.children.iter().position(|t| t.name == child_type) {
            Some(idx) => idx,
            None => {
                self.children.push(ChildType {
                    name: child_type.clone(),
                    entries: Vec::new(),
                });
                self.children.len() - 1
            }
        };

        let entry = &mut self.children[idx];
        if entry.get(&name).is_some() {
            return Err(Error::DuplicateChild { child_type, name });
        }
        let pos = entry.entries.len();
        entry.entries.push((name, child));
        Ok(&mut entry.entries[pos].1)
    }

    /// Remove and return a child. A type left without children is dropped.
    pub fn remove_child(&mut self, child_type: &str, name: &str) -> Option<Resource> {
        let type_idx = self.children.iter().position(|t| t.name == child_type)?;
        let entries = &mut self.children[type_idx].entries;
        let child_idx = entries.iter().position(|(n, _)| n == name)?;
        let (_, removed) = entries.remove(child_idx);
        if entries.is_empty() {
            self.children.remove(type_idx);
        }
        Some(removed)
    }

    /// Resource at `address` relative to this one.
    pub fn navigate(&self, address: &PathAddress) -> Option<&Resource> {
        address
            .iter()
            .try_fold(self, |current, element| current.child_at(element))
    }

    /// Mutable resource at `address` relative to this one.
    pub fn navigate_mut(&mut self, address: &PathAddress) -> Option<&mut Resource> {
        let mut current = self;
        for element in address {
            current = current.child_mut(&element.key, &element.value)?;
        }
        Some(current)
    }

    /// Like [`Resource::navigate`] but fails with [`Error::ResourceNotFound`].
    pub fn require(&self, address: &PathAddress) -> Result<&Resource> {
        self.navigate(address).ok_or_else(|| Error::ResourceNotFound {
            address: address.to_string(),
        })
    }

    fn type_entry(&self, child_type: &str) -> Option<&ChildType> {
        self.children.iter().find(|t| t.name == child_type)
    }
}

/// Structural equality: models, flags and child sets must match. Child and
/// type order is not significant.
impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        if self.model != other.model
            || self.proxy != other.proxy
            || self.runtime != other.runtime
            || self.children.len() != other.children.len()
        {
            return false;
        }
        self.children.iter().all(|t| {
            other.type_entry(&t.name).is_some_and(|o| {
                o.entries.len() == t.entries.len()
                    && t.entries
                        .iter()
                        .all(|(name, res)| o.get(name).is_some_and(|r| r == res))
            })
        })
    }
}

/// True if `resource` is eligible for persistence and diffing: it is neither
/// a proxy nor a runtime resource and its registration, when known, is not
/// an alias, remote or runtime-only registration.
pub fn is_persistent(resource: &Resource, registration: Option<&dyn Registration>) -> bool {
    !resource.is_proxy()
        && !resource.is_runtime()
        && registration.is_none_or(|r| is_registration_persistent(r))
}
