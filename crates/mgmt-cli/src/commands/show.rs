//! Show command implementation

use std::path::Path;

use colored::Colorize;
use mgmt_fs::read_resource;
use mgmt_model::{Model, Resource};
use serde_json::{Map, Value};

use super::resolve_dir;
use crate::error::Result;

/// Print the tree persisted in `dir`.
pub fn run_show(dir: &Path, json: bool) -> Result<()> {
    let root = resolve_dir(dir)?;
    let tree = read_resource(&root)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tree_to_json(&tree))?);
    } else {
        println!("{}{}", "/".bold(), format_attributes(tree.model()));
        print_children(&tree, 1);
    }
    Ok(())
}

/// `{"attributes": {...}, "children": {type: {name: {...}}}}`, in
/// iteration order.
pub(crate) fn tree_to_json(resource: &Resource) -> Value {
    let mut children = Map::new();
    for child_type in resource.child_types() {
        let named: Map<String, Value> = resource
            .children(child_type)
            .map(|(name, child)| (name.to_owned(), tree_to_json(child)))
            .collect();
        children.insert(child_type.to_owned(), Value::Object(named));
    }

    let mut doc = Map::new();
    doc.insert("attributes".into(), Value::Object(resource.model().clone()));
    if !children.is_empty() {
        doc.insert("children".into(), Value::Object(children));
    }
    Value::Object(doc)
}

fn print_children(resource: &Resource, depth: usize) {
    let indent = "  ".repeat(depth);
    for child_type in resource.child_types() {
        for (name, child) in resource.children(child_type) {
            println!(
                "{indent}{}={}{}",
                child_type.cyan(),
                name.green(),
                format_attributes(child.model())
            );
            print_children(child, depth + 1);
        }
    }
}

fn format_attributes(model: &Model) -> String {
    if model.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = model
        .iter()
        .map(|(name, value)| match value {
            Value::Null => format!("{name}=undefined"),
            other => format!("{name}={other}"),
        })
        .collect();
    format!(" ({})", pairs.join(", "))
}
