use mgmt_fs::{ConfigStore, Error};
use rstest::rstest;
use serde::{Deserialize, Serialize};
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct TestConfig {
    root: String,
    destructive: bool,
    ignore_types: Vec<String>,
}

fn sample() -> TestConfig {
    TestConfig {
        root: "/srv/config".into(),
        destructive: false,
        ignore_types: vec!["host".into()],
    }
}

#[rstest]
#[case("config.toml")]
#[case("config.json")]
#[case("config.yaml")]
#[case("config.yml")]
fn save_then_load(#[case] file_name: &str) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(file_name);
    let store = ConfigStore::new();

    store.save(&path, &sample()).unwrap();
    let loaded: TestConfig = store.load(&path).unwrap();

    assert_eq!(loaded, sample());
}

#[test]
fn load_reports_format_on_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.toml");
    fs::write(&path, "root = ").unwrap();

    let err = ConfigStore::new().load::<TestConfig>(&path).unwrap_err();
    assert!(matches!(err, Error::ConfigParse { ref format, .. } if format == "TOML"));
}

#[test]
fn unknown_extension_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.ini");
    fs::write(&path, "").unwrap();

    let err = ConfigStore::new().load::<TestConfig>(&path).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { .. }));
}
