//! Replaying a diff converges the actual tree onto the target

use mgmt_core::{ModelExecutor, OperationExecutor};
use mgmt_diff::{DiffOptions, diff, diff_dir, to_operations};
use mgmt_fs::{PersistOptions, persist};
use mgmt_model::{Model, PathAddress, Resource};
use proptest::prelude::*;
use serde_json::json;
use tempfile::TempDir;

const TYPES: [&str; 3] = ["a", "b", "c"];
const NAMES: [&str; 4] = ["1", "2", ".x", "y/z"];

fn node_model(value: u8) -> Model {
    json!({ "v": value }).as_object().cloned().unwrap()
}

fn insert(root: &mut Resource, path: &[(usize, usize)], value: u8) {
    let mut current = root;
    for &(t, n) in path {
        if current.child(TYPES[t], NAMES[n]).is_none() {
            current
                .register_child(TYPES[t], NAMES[n], Resource::with_model(node_model(0)))
                .unwrap();
        }
        current = current.child_mut(TYPES[t], NAMES[n]).unwrap();
    }
    current.write_model(node_model(value));
}

fn tree() -> impl Strategy<Value = Resource> {
    let entry = (prop::collection::vec((0..3usize, 0..4usize), 1..4), 0..3u8);
    prop::collection::vec(entry, 0..10).prop_map(|entries| {
        let mut root = Resource::with_model(node_model(0));
        for (path, value) in entries {
            insert(&mut root, &path, value);
        }
        root
    })
}

fn replay(start: &Resource, operations: &[mgmt_diff::Operation]) -> Resource {
    let mut executor = ModelExecutor::new(start.clone());
    for operation in operations {
        executor.execute(operation).unwrap();
    }
    executor.into_resource()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn in_memory_diff_replays_onto_target(actual in tree(), target in tree()) {
        let operations = to_operations(&diff(&actual, &target).unwrap()).unwrap();
        prop_assert_eq!(replay(&actual, &operations), target);
    }

    #[test]
    fn directory_diff_replays_onto_persisted_tree(actual in tree(), target in tree()) {
        let temp = TempDir::new().unwrap();
        persist(&target, None, temp.path(), &PersistOptions::default().with_order_files()).unwrap();

        let records = diff_dir(
            None,
            &PathAddress::root(),
            &actual,
            temp.path(),
            &DiffOptions::default(),
        )
        .unwrap();
        let operations = to_operations(&records).unwrap();
        prop_assert_eq!(replay(&actual, &operations), target);
    }
}
