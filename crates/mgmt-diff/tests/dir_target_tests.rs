//! Diffing a live tree against a persisted directory

use std::fs;

use mgmt_diff::{DiffOptions, DirTarget, Error, ResourceDiff, add_all, diff, diff_dir};
use mgmt_fs::{PersistOptions, persist};
use mgmt_model::{Model, PathAddress, Resource, ResourceRegistration};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

fn model(value: serde_json::Value) -> Model {
    value.as_object().cloned().unwrap()
}

fn live_tree() -> Resource {
    let mut root = Resource::with_model(model(json!({"name": "server"})));
    let logging = root
        .register_child("subsystem", "logging", Resource::with_model(model(json!({"level": "INFO"}))))
        .unwrap();
    logging
        .register_child("handler", "console", Resource::with_model(model(json!({"target": "stdout"}))))
        .unwrap();
    root.register_child("subsystem", "io", Resource::new()).unwrap();
    root.register_child("interface", "public", Resource::with_model(model(json!({"port": 8080}))))
        .unwrap();
    root
}

fn persisted(tree: &Resource) -> TempDir {
    let temp = TempDir::new().unwrap();
    persist(tree, None, temp.path(), &PersistOptions::default().with_order_files()).unwrap();
    temp
}

#[test]
fn unchanged_directory_yields_nothing() {
    let tree = live_tree();
    let temp = persisted(&tree);

    let records = diff_dir(
        None,
        &PathAddress::root(),
        &tree,
        temp.path(),
        &DiffOptions::default(),
    )
    .unwrap();
    assert!(records.is_empty());
}

#[test]
fn on_disk_edits_match_in_memory_diff() {
    let live = live_tree();

    let mut edited = live_tree();
    edited
        .child_mut("subsystem", "logging")
        .unwrap()
        .write_model(model(json!({"level": "DEBUG"})));
    edited.remove_child("subsystem", "io");
    edited
        .register_child("subsystem", "jmx", Resource::with_model(model(json!({"enabled": true}))))
        .unwrap();
    let temp = persisted(&edited);

    let from_dir = diff_dir(
        None,
        &PathAddress::root(),
        &live,
        temp.path(),
        &DiffOptions::default(),
    )
    .unwrap();

    assert_eq!(from_dir, diff(&live, &edited).unwrap());
    assert_eq!(from_dir.len(), 3);
}

#[test]
fn directory_deleted_by_hand_is_removed() {
    let live = live_tree();
    let temp = persisted(&live);
    fs::remove_dir_all(temp.path().join("subsystem/logging")).unwrap();
    fs::write(temp.path().join("subsystem/order.txt"), "io\n").unwrap();

    let records = diff_dir(
        None,
        &PathAddress::root(),
        &live,
        temp.path(),
        &DiffOptions::default(),
    )
    .unwrap();

    let logging = PathAddress::from_pairs([("subsystem", "logging")]);
    assert_eq!(
        records,
        vec![
            ResourceDiff::RemoveResource {
                address: logging.child("handler", "console"),
            },
            ResourceDiff::RemoveResource { address: logging },
        ]
    );
}

#[test]
fn directory_created_by_hand_is_added() {
    let live = live_tree();
    let temp = persisted(&live);
    // no order file below the new type: children come back sorted
    for name in ["b", "a"] {
        let dir = temp.path().join("socket-binding").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("attributes.dmr"), format!(r#"{{"port": "{name}"}}"#)).unwrap();
    }
    fs::write(temp.path().join("order.txt"), "subsystem\ninterface\nsocket-binding\n").unwrap();

    let records = diff_dir(
        None,
        &PathAddress::root(),
        &live,
        temp.path(),
        &DiffOptions::default(),
    )
    .unwrap();

    assert_eq!(
        records,
        vec![
            ResourceDiff::AddResource {
                address: PathAddress::from_pairs([("socket-binding", "a")]),
                attributes: model(json!({"port": "a"})),
            },
            ResourceDiff::AddResource {
                address: PathAddress::from_pairs([("socket-binding", "b")]),
                attributes: model(json!({"port": "b"})),
            },
        ]
    );
}

#[test]
fn skipped_types_are_left_alone() {
    let mut live = live_tree();
    live.register_child("host", "primary", Resource::new()).unwrap();
    let temp = persisted(&live_tree());

    let records = diff_dir(
        None,
        &PathAddress::root(),
        &live,
        temp.path(),
        &DiffOptions::default().skip_type("host"),
    )
    .unwrap();
    assert!(records.is_empty());
}

#[test]
fn metadata_filters_directory_attributes() {
    let reg = ResourceRegistration::new()
        .configuration("name")
        .wildcard_child("subsystem", ResourceRegistration::new().configuration("level"));
    let mut live = Resource::with_model(model(json!({"name": "server"})));
    live.register_child("subsystem", "logging", Resource::with_model(model(json!({"level": "INFO"}))))
        .unwrap();

    let temp = TempDir::new().unwrap();
    let logging_dir = temp.path().join("subsystem/logging");
    fs::create_dir_all(&logging_dir).unwrap();
    fs::write(temp.path().join("attributes.dmr"), r#"{"name": "server", "uptime": 10}"#).unwrap();
    fs::write(logging_dir.join("attributes.dmr"), r#"{"level": "WARN"}"#).unwrap();

    let records = diff_dir(
        Some(&reg),
        &PathAddress::root(),
        &live,
        temp.path(),
        &DiffOptions::default(),
    )
    .unwrap();

    assert_eq!(
        records,
        vec![ResourceDiff::WriteAttribute {
            address: PathAddress::from_pairs([("subsystem", "logging")]),
            attributes: model(json!({"level": "WARN"})),
        }]
    );
}

#[test]
fn add_all_from_directory_at_an_address() {
    let temp = persisted(&live_tree());
    let base = PathAddress::from_pairs([("host", "primary")]);

    let records = add_all(None, &base, &DirTarget::new(temp.path()), &DiffOptions::default()).unwrap();

    assert_eq!(records.len(), 5);
    assert!(records.iter().all(ResourceDiff::is_add));
    assert_eq!(records[0].address(), &base);
    assert!(records.iter().skip(1).all(|r| base.is_ancestor_of(r.address())));
    assert_eq!(
        records[2].address(),
        &base
            .child("subsystem", "logging")
            .child("handler", "console")
    );
}

#[test]
fn missing_directory_is_an_argument_error() {
    let temp = TempDir::new().unwrap();
    let err = diff_dir(
        None,
        &PathAddress::root(),
        &Resource::new(),
        &temp.path().join("absent"),
        &DiffOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Fs(mgmt_fs::Error::InvalidArgument { .. })));
}

#[test]
fn foreign_files_are_rejected_like_read_resource() {
    let mut tree = Resource::new();
    tree.register_child("a", "1", Resource::new()).unwrap();

    let in_type_dir = persisted(&tree);
    fs::write(in_type_dir.path().join("a/stray"), "").unwrap();

    let in_resource_dir = persisted(&tree);
    fs::write(in_resource_dir.path().join("a/1/notes.txt"), "").unwrap();

    for temp in [&in_type_dir, &in_resource_dir] {
        assert!(matches!(
            mgmt_fs::read_resource(temp.path()),
            Err(mgmt_fs::Error::UnexpectedFile { .. })
        ));
        let err = diff_dir(
            None,
            &PathAddress::root(),
            &Resource::new(),
            temp.path(),
            &DiffOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Fs(mgmt_fs::Error::UnexpectedFile { .. })));
    }
}

#[test]
fn added_resources_converge_despite_undefined_attributes() {
    let mut tree = Resource::new();
    tree.register_child("a", "1", Resource::with_model(model(json!({"x": null, "y": 1}))))
        .unwrap();
    let temp = persisted(&tree);

    let records = diff_dir(
        None,
        &PathAddress::root(),
        &Resource::new(),
        temp.path(),
        &DiffOptions::default(),
    )
    .unwrap();
    assert_eq!(
        records,
        vec![ResourceDiff::AddResource {
            address: PathAddress::from_pairs([("a", "1")]),
            attributes: model(json!({"y": 1})),
        }]
    );

    let mut replayed = Resource::new();
    replayed
        .register_child("a", "1", Resource::with_model(model(json!({"y": 1}))))
        .unwrap();
    assert!(diff(&replayed, &tree).unwrap().is_empty());
    assert!(
        diff_dir(None, &PathAddress::root(), &replayed, temp.path(), &DiffOptions::default())
            .unwrap()
            .is_empty()
    );
}
