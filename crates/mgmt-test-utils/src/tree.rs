//! In-memory tree fixtures

use mgmt_model::{Model, Resource, ResourceRegistration};
use serde_json::Value;

/// Attribute model from a JSON object literal.
///
/// # Panics
/// Panics if `value` is not an object.
pub fn model(value: Value) -> Model {
    match value {
        Value::Object(map) => map,
        other => panic!("model must be a JSON object, got {other}"),
    }
}

/// Builds a resource tree from addressed entries.
///
/// ```rust
/// use mgmt_test_utils::TreeBuilder;
/// use serde_json::json;
///
/// let tree = TreeBuilder::new()
///     .attrs(json!({"name": "server"}))
///     .at(&[("subsystem", "logging")], json!({"level": "INFO"}))
///     .at(&[("subsystem", "logging"), ("handler", "console")], json!({}))
///     .build();
/// assert_eq!(tree.children_names("subsystem").count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
    root: Resource,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attributes of the root.
    pub fn attrs(mut self, attributes: Value) -> Self {
        self.root.write_model(model(attributes));
        self
    }

    /// Set the attributes of the resource at `path`, creating it and any
    /// missing ancestors (with empty models) on the way.
    pub fn at(mut self, path: &[(&str, &str)], attributes: Value) -> Self {
        let mut current = &mut self.root;
        for &(child_type, name) in path {
            if current.child(child_type, name).is_none() {
                current
                    .register_child(child_type, name, Resource::new())
                    .unwrap();
            }
            current = current.child_mut(child_type, name).unwrap();
        }
        current.write_model(model(attributes));
        self
    }

    /// Mark the resource at `path` as runtime-only. The resource must exist.
    pub fn runtime(mut self, path: &[(&str, &str)]) -> Self {
        let address = mgmt_model::PathAddress::from_pairs(path.iter().copied());
        self.root
            .navigate_mut(&address)
            .unwrap_or_else(|| panic!("no resource at {address}"))
            .set_runtime(true);
        self
    }

    pub fn build(self) -> Resource {
        self.root
    }
}

/// The tree most crate tests start from:
///
/// ```text
/// (name=server)
/// ├── subsystem=logging (level=INFO)
/// │   └── handler=console (target=stdout)
/// ├── subsystem=io
/// └── interface=public (port=8080)
/// ```
pub fn server_tree() -> Resource {
    TreeBuilder::new()
        .attrs(serde_json::json!({"name": "server"}))
        .at(&[("subsystem", "logging")], serde_json::json!({"level": "INFO"}))
        .at(
            &[("subsystem", "logging"), ("handler", "console")],
            serde_json::json!({"target": "stdout"}),
        )
        .at(&[("subsystem", "io")], serde_json::json!({}))
        .at(&[("interface", "public")], serde_json::json!({"port": 8080}))
        .build()
}

/// Metadata matching [`server_tree`]: every attribute shown there is a
/// configuration attribute and each type accepts any name.
pub fn server_registration() -> ResourceRegistration {
    ResourceRegistration::new()
        .configuration("name")
        .wildcard_child(
            "subsystem",
            ResourceRegistration::new()
                .configuration("level")
                .configuration("enabled")
                .wildcard_child("handler", ResourceRegistration::new().configuration("target")),
        )
        .wildcard_child(
            "interface",
            ResourceRegistration::new()
                .configuration("port")
                .runtime_attribute("bound"),
        )
}
