//! Diff records

use mgmt_model::{Model, PathAddress};
use serde::Serialize;

use crate::operation::Operation;
use crate::{Error, Result};

/// One unit of structural delta between two resource trees.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ResourceDiff {
    /// Create the resource with the given configuration attributes
    AddResource {
        address: PathAddress,
        attributes: Model,
    },
    /// Remove the resource
    RemoveResource { address: PathAddress },
    /// Set one or more attributes to new values; `null` undefines
    WriteAttribute {
        address: PathAddress,
        attributes: Model,
    },
}

impl ResourceDiff {
    pub fn address(&self) -> &PathAddress {
        match self {
            Self::AddResource { address, .. }
            | Self::RemoveResource { address }
            | Self::WriteAttribute { address, .. } => address,
        }
    }

    pub fn is_add(&self) -> bool {
        matches!(self, Self::AddResource { .. })
    }

    pub fn is_remove(&self) -> bool {
        matches!(self, Self::RemoveResource { .. })
    }

    /// Translate into the operation an executor applies.
    ///
    /// A write of one attribute becomes a single `write-attribute`; a write
    /// of several becomes a `composite` of one `write-attribute` per name.
    ///
    /// # Errors
    ///
    /// [`Error::IllegalState`] for a write record without attributes.
    pub fn to_operation(&self) -> Result<Operation> {
        match self {
            Self::AddResource {
                address,
                attributes,
            } => Ok(Operation::Add {
                address: address.clone(),
                params: attributes.clone(),
            }),
            Self::RemoveResource { address } => Ok(Operation::Remove {
                address: address.clone(),
            }),
            Self::WriteAttribute {
                address,
                attributes,
            } => {
                let mut steps: Vec<Operation> = attributes
                    .iter()
                    .map(|(name, value)| Operation::WriteAttribute {
                        address: address.clone(),
                        name: name.clone(),
                        value: value.clone(),
                    })
                    .collect();
                match steps.len() {
                    0 => Err(Error::IllegalState {
                        message: format!("Attribute write at {address} has no attributes"),
                    }),
                    1 => Ok(steps.remove(0)),
                    _ => Ok(Operation::Composite { steps }),
                }
            }
        }
    }
}

/// Translate records in order.
pub fn to_operations(diffs: &[ResourceDiff]) -> Result<Vec<Operation>> {
    diffs.iter().map(ResourceDiff::to_operation).collect()
}
