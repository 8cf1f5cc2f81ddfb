use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mgmt_fs::escape::{decode, encode};
use mgmt_fs::{PersistOptions, persist, read_resource};
use mgmt_model::Resource;
use serde_json::json;
use tempfile::tempdir;

fn wide_tree(types: usize, children: usize) -> Resource {
    let mut root = Resource::new();
    for t in 0..types {
        for c in 0..children {
            let child = root
                .register_child(format!("type-{t}"), format!("child-{c}"), Resource::new())
                .unwrap();
            child.model_mut().insert("index".into(), json!(c));
            child.model_mut().insert("enabled".into(), json!(true));
        }
    }
    root
}

fn escape_benchmark(c: &mut Criterion) {
    c.bench_function("escape::encode (plain)", |b| {
        b.iter(|| encode(black_box("standard-sockets")))
    });
    c.bench_function("escape::encode (escaped)", |b| {
        b.iter(|| encode(black_box(".java:/jboss/datasources/ExampleDS%")))
    });
    c.bench_function("escape::decode", |b| {
        b.iter(|| decode(black_box("%2ejava:%2fjboss%2fdatasources%2fExampleDS%25")).unwrap())
    });
}

fn persist_benchmark(c: &mut Criterion) {
    let tree = wide_tree(5, 20);

    c.bench_function("persist (5x20, warm)", |b| {
        let dir = tempdir().unwrap();
        persist(&tree, None, dir.path(), &PersistOptions::default()).unwrap();
        b.iter(|| persist(black_box(&tree), None, dir.path(), &PersistOptions::default()).unwrap())
    });

    c.bench_function("read_resource (5x20)", |b| {
        let dir = tempdir().unwrap();
        persist(&tree, None, dir.path(), &PersistOptions::default()).unwrap();
        b.iter(|| read_resource(black_box(dir.path())).unwrap())
    });
}

criterion_group!(benches, escape_benchmark, persist_benchmark);
criterion_main!(benches);
