//! Scratch directories and structural assertions

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use mgmt_fs::{PersistOptions, ResourceFile, escape, persist, read_resource, read_resource_file};
use mgmt_model::Resource;
use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;

/// A temporary directory holding one persisted tree.
///
/// # Example
///
/// ```rust
/// use mgmt_test_utils::{TestDir, server_tree};
///
/// let dir = TestDir::new();
/// dir.persist(&server_tree());
/// dir.assert_exists("subsystem/logging/attributes.dmr");
/// ```
pub struct TestDir {
    temp_dir: TempDir,
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDir {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Directory of the resource at `path`, with escaped names.
    pub fn resource_dir(&self, path: &[(&str, &str)]) -> PathBuf {
        let mut dir = self.root().to_path_buf();
        for &(child_type, name) in path {
            dir.push(&*escape::encode(child_type));
            dir.push(&*escape::encode(name));
        }
        dir
    }

    /// Create the directory of the resource at `path`.
    pub fn create_child_on_fs(&self, path: &[(&str, &str)]) -> PathBuf {
        let dir = self.resource_dir(path);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Write `attributes` as the attribute file of the resource at `path`,
    /// creating its directory if needed.
    pub fn store_attributes_on_fs(&self, path: &[(&str, &str)], attributes: Value) -> PathBuf {
        let dir = self.create_child_on_fs(path);
        fs::write(
            dir.join(ResourceFile::Attributes.as_str()),
            serde_json::to_string_pretty(&attributes).unwrap(),
        )
        .unwrap();
        dir
    }

    /// Write an order manifest into `relative` (a directory below the root).
    pub fn write_order(&self, relative: &str, names: &[&str]) {
        let mut content = names.join("\n");
        content.push('\n');
        fs::write(
            self.root().join(relative).join(ResourceFile::Order.as_str()),
            content,
        )
        .unwrap();
    }

    pub fn remove(&self, relative: &str) {
        let path = self.root().join(relative);
        if path.is_dir() {
            fs::remove_dir_all(&path).unwrap();
        } else {
            fs::remove_file(&path).unwrap();
        }
    }

    pub fn persist(&self, resource: &Resource) {
        self.persist_with(resource, &PersistOptions::default());
    }

    pub fn persist_with(&self, resource: &Resource, options: &PersistOptions) {
        persist(resource, None, self.root(), options).unwrap();
    }

    pub fn read(&self) -> Resource {
        read_resource(self.root()).unwrap()
    }

    /// Sorted, `/`-separated relative paths of every entry below the root.
    pub fn listing(&self) -> Vec<String> {
        fn walk(base: &Path, dir: &Path, out: &mut Vec<String>) {
            for entry in fs::read_dir(dir).unwrap() {
                let path = entry.unwrap().path();
                let relative = path.strip_prefix(base).unwrap();
                out.push(relative.to_string_lossy().replace('\\', "/"));
                if path.is_dir() {
                    walk(base, &path, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(self.root(), self.root(), &mut out);
        out.sort();
        out
    }

    /// # Panics
    /// Panics with a descriptive message if `relative` does not exist.
    pub fn assert_exists(&self, relative: &str) {
        let path = self.root().join(relative);
        assert!(path.exists(), "Expected path to exist: {}", path.display());
    }

    /// # Panics
    /// Panics with a descriptive message if `relative` exists.
    pub fn assert_not_exists(&self, relative: &str) {
        let path = self.root().join(relative);
        assert!(!path.exists(), "Expected path NOT to exist: {}", path.display());
    }
}

/// Assert that the tree read back from `dir` equals `expected`.
pub fn assert_read(expected: &Resource, dir: &Path) {
    let read = read_resource(dir)
        .unwrap_or_else(|e| panic!("Failed to read resource from {}: {e}", dir.display()));
    assert_resources_equal(expected, &read);
}

/// Assert two trees are identical: models, type sets, child name sets, and
/// recursively every child.
pub fn assert_resources_equal(expected: &Resource, actual: &Resource) {
    assert_eq!(
        expected.is_model_defined(),
        actual.is_model_defined(),
        "model definedness differs"
    );
    assert_eq!(expected.model(), actual.model());

    let expected_types: HashSet<&str> = expected.child_types().collect();
    let actual_types: HashSet<&str> = actual.child_types().collect();
    assert_eq!(expected_types, actual_types);

    for child_type in expected_types {
        let expected_names: HashSet<&str> = expected.children_names(child_type).collect();
        let actual_names: HashSet<&str> = actual.children_names(child_type).collect();
        assert_eq!(expected_names, actual_names, "children of type {child_type}");
        for name in expected_names {
            assert_resources_equal(
                expected.child(child_type, name).unwrap(),
                actual.child(child_type, name).unwrap(),
            );
        }
    }
}

/// Assert that `dir` holds exactly the persisted form of `resource`:
/// its attribute file, one directory per type and one per child, and nothing
/// besides optional order manifests.
pub fn assert_persisted(resource: &Resource, dir: &Path) {
    let attributes = read_resource_file(dir)
        .unwrap_or_else(|e| panic!("Failed to read attributes in {}: {e}", dir.display()));
    assert_eq!(resource.model(), &attributes, "attributes of {}", dir.display());

    if !resource.has_children() {
        assert_no_types(dir);
        return;
    }

    let mut fs_types = Vec::new();
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        if path.is_file() {
            assert!(
                ResourceFile::from_name(&name).is_some(),
                "Unexpected file in the resource dir {}",
                path.display()
            );
            continue;
        }
        fs_types.push((escape::decode(&name).unwrap().into_owned(), path));
    }

    let expected: HashSet<&str> = resource.child_types().collect();
    let found: HashSet<&str> = fs_types.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(expected, found, "types in {}", dir.display());

    for (child_type, type_dir) in &fs_types {
        let mut found_names = HashSet::new();
        for entry in fs::read_dir(type_dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_file() {
                assert_eq!(
                    path.file_name().and_then(|n| n.to_str()),
                    Some(ResourceFile::Order.as_str()),
                    "Unexpected file in the type dir {}",
                    type_dir.display()
                );
                continue;
            }
            let name = escape::decode(&path.file_name().unwrap().to_string_lossy())
                .unwrap()
                .into_owned();
            let child = resource
                .child(child_type, &name)
                .unwrap_or_else(|| panic!("Unexpected child {}", path.display()));
            assert_persisted(child, &path);
            found_names.insert(name);
        }
        let expected_names: HashSet<String> =
            resource.children_names(child_type).map(str::to_owned).collect();
        assert_eq!(expected_names, found_names, "children in {}", type_dir.display());
    }
}

/// Assert that the resource directory holds no type directories.
pub fn assert_no_types(dir: &Path) {
    assert!(dir.is_dir(), "Not a directory: {}", dir.display());
    let extra: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| {
            let name = p.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            !(p.is_file() && ResourceFile::from_name(name).is_some())
        })
        .map(|p| p.display().to_string())
        .collect();
    assert!(extra.is_empty(), "Unexpected entries in {}: {extra:?}", dir.display());
}
