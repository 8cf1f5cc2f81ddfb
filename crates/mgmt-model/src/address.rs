//! Absolute resource addresses

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of an address: a child type and the child's name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathElement {
    /// Child type, e.g. `subsystem`
    pub key: String,
    /// Child name within the type, e.g. `logging`
    pub value: String,
}

impl PathElement {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Address of a resource relative to the tree root.
///
/// The empty address is the root itself. Addresses are values: extending one
/// with [`PathAddress::append`] returns a new address and leaves the original
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathAddress {
    elements: Vec<PathElement>,
}

impl PathAddress {
    /// The root address.
    pub const fn root() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Build an address from `(type, name)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            elements: pairs
                .into_iter()
                .map(|(k, v)| PathElement::new(k, v))
                .collect(),
        }
    }

    /// Return a new address with `element` appended.
    pub fn append(&self, element: PathElement) -> Self {
        let mut elements = Vec::with_capacity(self.elements.len() + 1);
        elements.extend_from_slice(&self.elements);
        elements.push(element);
        Self { elements }
    }

    /// Shorthand for `append(PathElement::new(key, value))`.
    pub fn child(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(PathElement::new(key, value))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathElement> {
        self.elements.iter()
    }

    /// Last element, `None` for the root.
    pub fn last(&self) -> Option<&PathElement> {
        self.elements.last()
    }

    /// Address of the parent, `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.elements.split_last()?;
        Some(Self {
            elements: rest.to_vec(),
        })
    }

    /// True if `other` is a strict descendant of this address.
    pub fn is_ancestor_of(&self, other: &PathAddress) -> bool {
        other.elements.len() > self.elements.len() && other.elements.starts_with(&self.elements)
    }
}

impl fmt::Display for PathAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.elements.is_empty() {
            return write!(f, "/");
        }
        for element in &self.elements {
            write!(f, "/{}", element)?;
        }
        Ok(())
    }
}

impl From<Vec<PathElement>> for PathAddress {
    fn from(elements: Vec<PathElement>) -> Self {
        Self { elements }
    }
}

impl<'a> IntoIterator for &'a PathAddress {
    type Item = &'a PathElement;
    type IntoIter = std::slice::Iter<'a, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
