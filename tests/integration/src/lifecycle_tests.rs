//! Persist -> edit on disk -> sync -> replay, end to end

use mgmt_core::{
    FsTreePersister, ModelExecutor, OperationExecutor, PersistenceConfig, persist_to_fs,
    sync_with_fs,
};
use mgmt_diff::{DiffOptions, diff_dir};
use mgmt_fs::PersistOptions;
use mgmt_model::{PathAddress, PathElement, Resource};
use mgmt_test_utils::{
    TestDir, TreeBuilder, assert_persisted, assert_read, server_registration, server_tree,
};
use pretty_assertions::assert_eq;
use serde_json::json;

// ============================================================================
// Edit on disk, sync, persist back
// ============================================================================

#[test]
fn disk_edits_round_trip_through_sync() {
    let dir = TestDir::new();
    let live = server_tree();
    assert!(persist_to_fs(&live, None, dir.root()).unwrap());

    // an operator edits the persisted tree by hand
    dir.store_attributes_on_fs(&[("subsystem", "logging")], json!({"level": "TRACE"}));
    dir.store_attributes_on_fs(
        &[("subsystem", "logging"), ("handler", "file")],
        json!({"target": "server.log"}),
    );
    dir.remove("interface/public");
    dir.store_attributes_on_fs(&[("interface", "management")], json!({"port": 9990}));

    let registration = server_registration();
    let mut executor = ModelExecutor::new(live.clone());
    let report = sync_with_fs(
        &mut executor,
        &live,
        Some(&registration),
        &PathAddress::root(),
        dir.root(),
    )
    .unwrap();
    assert!(report.success, "errors: {:?}", report.errors);

    let synced = executor.into_resource();
    assert_read(&synced, dir.root());

    // writing the synced tree back leaves the directory as the operator left it
    let before = dir.listing();
    persist_to_fs(&synced, Some(&registration), dir.root()).unwrap();
    assert_eq!(dir.listing(), before);
    assert_persisted(&synced, dir.root());
}

#[test]
fn sync_is_a_no_op_once_converged() {
    let dir = TestDir::new();
    let mut edited = server_tree();
    edited.remove_child("subsystem", "io");
    dir.persist(&edited);

    let live = server_tree();
    let mut executor = ModelExecutor::new(live.clone());
    sync_with_fs(&mut executor, &live, None, &PathAddress::root(), dir.root()).unwrap();

    let converged = executor.resource().clone();
    let records = diff_dir(
        None,
        &PathAddress::root(),
        &converged,
        dir.root(),
        &DiffOptions::default(),
    )
    .unwrap();
    assert!(records.is_empty());
}

// ============================================================================
// Boot cycle through the persister
// ============================================================================

#[test]
fn boot_store_reboot_cycle() {
    let config_dir = TestDir::new();
    let tree_dir = TestDir::new();
    tree_dir.persist(&server_tree());

    let mut config = PersistenceConfig::new(tree_dir.root());
    config.write_order_files = true;
    let config_path = config_dir.root().join("persistence.toml");
    config.save(&config_path).unwrap();

    let registration = server_registration();

    // first boot: replay the persisted tree into an empty model
    let persister = FsTreePersister::from_config(&PersistenceConfig::load(&config_path).unwrap());
    let mut executor = ModelExecutor::default();
    for operation in persister.load(&Resource::new(), Some(&registration)).unwrap() {
        executor.execute(&operation).unwrap();
    }
    assert_eq!(executor.resource(), &server_tree());
    persister.successful_boot();

    // runtime change, stored after boot
    executor
        .execute(&mgmt_diff::Operation::Add {
            address: PathAddress::from_pairs([("subsystem", "jmx")]),
            params: json!({"enabled": false}).as_object().cloned().unwrap(),
        })
        .unwrap();
    persister
        .store(executor.resource(), Some(&registration))
        .commit()
        .unwrap();
    tree_dir.assert_exists("subsystem/jmx/attributes.dmr");
    tree_dir.assert_exists("subsystem/order.txt");

    // second boot sees the stored change
    let rebooted = FsTreePersister::from_config(&config);
    let mut fresh = ModelExecutor::default();
    for operation in rebooted.load(&Resource::new(), Some(&registration)).unwrap() {
        fresh.execute(&operation).unwrap();
    }
    assert_eq!(fresh.resource(), executor.resource());
}

#[test]
fn host_trees_load_under_their_prefix() {
    let domain = TestDir::new();
    domain.persist(&TreeBuilder::new().at(&[("profile", "default")], json!({})).build());
    domain.store_attributes_on_fs(&[("host", "stale")], json!({"name": "stale"}));

    let host = TestDir::new();
    host.persist(
        &TreeBuilder::new()
            .attrs(json!({"name": "primary"}))
            .at(&[("interface", "management")], json!({"port": 9990}))
            .build(),
    );
    let host_name = mgmt_core::read_host_name(host.root()).unwrap();
    assert_eq!(host_name, "primary");

    let persister = FsTreePersister::new(domain.root());
    persister.register_additional_root(PathElement::new("host", host_name), host.root());

    let rendered: Vec<String> = persister
        .load(&Resource::new(), None)
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();

    assert_eq!(
        rendered,
        vec![
            "/profile=default:add",
            r#"/host=primary:add(name="primary")"#,
            "/host=primary/interface=management:add(port=9990)",
        ]
    );
}

// ============================================================================
// Names that are not safe path components
// ============================================================================

#[test]
fn hostile_names_survive_persist_sync_and_replay() {
    let names = ["java:/jboss/datasources/Example", "..", ".profile", "100%", "ünï"];
    let mut target = Resource::new();
    for name in names {
        target
            .register_child(
                "data-source",
                name,
                Resource::with_model(json!({"jndi": name}).as_object().cloned().unwrap()),
            )
            .unwrap();
    }

    let dir = TestDir::new();
    dir.persist_with(&target, &PersistOptions::default().with_order_files());

    let live = Resource::new();
    let mut executor = ModelExecutor::new(live.clone());
    let report =
        sync_with_fs(&mut executor, &live, None, &PathAddress::root(), dir.root()).unwrap();

    assert!(report.success);
    assert_eq!(report.applied.len(), names.len());
    assert_eq!(
        executor
            .resource()
            .children_names("data-source")
            .collect::<Vec<_>>(),
        names.to_vec()
    );
}
