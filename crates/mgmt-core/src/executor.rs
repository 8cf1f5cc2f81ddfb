//! Operation execution
//!
//! [`OperationExecutor`] is the seam between the diff engine and whatever
//! owns the live model. [`ModelExecutor`] applies operations to an in-memory
//! [`Resource`] tree and rejects anything that would not be valid in replay
//! order, so a misordered operation list fails instead of silently producing
//! a different tree.

use mgmt_diff::Operation;
use mgmt_model::{PathAddress, PathElement, Resource};

use crate::{Error, Result};

/// Applies management operations one at a time, in the order given.
pub trait OperationExecutor {
    fn execute(&mut self, operation: &Operation) -> Result<()>;
}

/// Collects operations instead of applying them.
impl OperationExecutor for Vec<Operation> {
    fn execute(&mut self, operation: &Operation) -> Result<()> {
        self.push(operation.clone());
        Ok(())
    }
}

/// Executor over an owned in-memory tree.
#[derive(Debug, Clone, Default)]
pub struct ModelExecutor {
    root: Resource,
    applied: usize,
}

impl ModelExecutor {
    pub fn new(root: Resource) -> Self {
        Self { root, applied: 0 }
    }

    pub fn resource(&self) -> &Resource {
        &self.root
    }

    pub fn into_resource(self) -> Resource {
        self.root
    }

    /// Number of top-level operations applied successfully.
    pub fn applied(&self) -> usize {
        self.applied
    }
}

impl OperationExecutor for ModelExecutor {
    fn execute(&mut self, operation: &Operation) -> Result<()> {
        apply(&mut self.root, operation)?;
        self.applied += 1;
        tracing::debug!(%operation, "Applied operation");
        Ok(())
    }
}

fn apply(root: &mut Resource, operation: &Operation) -> Result<()> {
    match operation {
        Operation::Add { address, params } => {
            let (parent, element) = split(operation, address)?;
            let parent_resource = root
                .navigate_mut(&parent)
                .ok_or_else(|| Error::NoSuchResource {
                    address: parent.to_string(),
                })?;
            if parent_resource.child_at(element).is_some() {
                return Err(Error::DuplicateResource {
                    address: address.to_string(),
                });
            }
            parent_resource.register_child(
                element.key.as_str(),
                element.value.as_str(),
                Resource::with_model(params.clone()),
            )?;
            Ok(())
        }
        Operation::Remove { address } => {
            let (parent, element) = split(operation, address)?;
            let target = root.navigate(address).ok_or_else(|| Error::NoSuchResource {
                address: address.to_string(),
            })?;
            if target.has_children() {
                return Err(Error::OperationFailed {
                    operation: operation.name().into(),
                    message: format!("{address} still has children"),
                });
            }
            if let Some(parent_resource) = root.navigate_mut(&parent) {
                parent_resource.remove_child(&element.key, &element.value);
            }
            Ok(())
        }
        Operation::WriteAttribute {
            address,
            name,
            value,
        } => {
            let target = root
                .navigate_mut(address)
                .ok_or_else(|| Error::NoSuchResource {
                    address: address.to_string(),
                })?;
            target.model_mut().insert(name.clone(), value.clone());
            Ok(())
        }
        Operation::Composite { steps } => {
            // all or nothing: work on a copy and swap it in on success
            let mut scratch = root.clone();
            for step in steps {
                apply(&mut scratch, step)?;
            }
            *root = scratch;
            Ok(())
        }
    }
}

fn split<'a>(
    operation: &Operation,
    address: &'a PathAddress,
) -> Result<(PathAddress, &'a PathElement)> {
    match (address.parent(), address.last()) {
        (Some(parent), Some(element)) => Ok((parent, element)),
        _ => Err(Error::OperationFailed {
            operation: operation.name().into(),
            message: "not applicable to the root resource".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgmt_model::Model;
    use serde_json::json;

    fn params(value: serde_json::Value) -> Model {
        value.as_object().cloned().unwrap()
    }

    fn add(pairs: &[(&str, &str)]) -> Operation {
        Operation::Add {
            address: PathAddress::from_pairs(pairs.iter().copied()),
            params: Model::new(),
        }
    }

    #[test]
    fn add_requires_existing_parent() {
        let mut executor = ModelExecutor::default();
        let err = executor.execute(&add(&[("a", "1"), ("b", "1")])).unwrap_err();
        assert!(matches!(err, Error::NoSuchResource { .. }));
        assert_eq!(executor.applied(), 0);
    }

    #[test]
    fn add_rejects_duplicates() {
        let mut executor = ModelExecutor::default();
        executor.execute(&add(&[("a", "1")])).unwrap();
        let err = executor.execute(&add(&[("a", "1")])).unwrap_err();
        assert!(matches!(err, Error::DuplicateResource { .. }));
    }

    #[test]
    fn remove_requires_leaf() {
        let mut executor = ModelExecutor::default();
        executor.execute(&add(&[("a", "1")])).unwrap();
        executor.execute(&add(&[("a", "1"), ("b", "1")])).unwrap();

        let remove_parent = Operation::Remove {
            address: PathAddress::from_pairs([("a", "1")]),
        };
        assert!(matches!(
            executor.execute(&remove_parent),
            Err(Error::OperationFailed { .. })
        ));

        executor
            .execute(&Operation::Remove {
                address: PathAddress::from_pairs([("a", "1"), ("b", "1")]),
            })
            .unwrap();
        executor.execute(&remove_parent).unwrap();
        assert!(!executor.resource().has_children());
    }

    #[test]
    fn root_cannot_be_added_or_removed() {
        let mut executor = ModelExecutor::default();
        let err = executor
            .execute(&Operation::Remove {
                address: PathAddress::root(),
            })
            .unwrap_err();
        assert!(matches!(err, Error::OperationFailed { .. }));
    }

    #[test]
    fn write_attribute_sets_and_undefines() {
        let mut executor = ModelExecutor::new(Resource::with_model(params(json!({"one": 1}))));
        executor
            .execute(&Operation::WriteAttribute {
                address: PathAddress::root(),
                name: "one".into(),
                value: serde_json::Value::Null,
            })
            .unwrap();
        assert_eq!(executor.resource().model(), &params(json!({"one": null})));
    }

    #[test]
    fn composite_is_all_or_nothing() {
        let mut executor = ModelExecutor::default();
        let composite = Operation::Composite {
            steps: vec![
                add(&[("a", "1")]),
                Operation::WriteAttribute {
                    address: PathAddress::from_pairs([("a", "1")]),
                    name: "x".into(),
                    value: json!(1),
                },
                add(&[("missing", "1"), ("b", "1")]),
            ],
        };

        assert!(executor.execute(&composite).is_err());
        assert!(!executor.resource().has_children());
    }

    #[test]
    fn vec_records_operations() {
        let mut recorded: Vec<Operation> = Vec::new();
        recorded.execute(&add(&[("a", "1")])).unwrap();
        assert_eq!(recorded, vec![add(&[("a", "1")])]);
    }
}
