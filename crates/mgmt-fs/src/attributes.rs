//! Attribute file of a resource directory

use std::path::Path;

use mgmt_model::Model;

use crate::constants::ResourceFile;
use crate::{Error, Result, io};

/// Read the attributes of the resource persisted in `dir`.
///
/// A missing attribute file yields an empty (undefined) model.
///
/// # Errors
///
/// - [`Error::IllegalState`] if the attribute path exists but is not a file
/// - [`Error::AttributeParse`] if the file is not a JSON object
pub fn read_resource_file(dir: &Path) -> Result<Model> {
    let path = dir.join(ResourceFile::Attributes);
    if !path.exists() {
        return Ok(Model::new());
    }
    if !path.is_file() {
        return Err(Error::illegal_state(format!(
            "{} is not a file",
            path.display()
        )));
    }

    let content = io::read_text(&path)?;
    let parse_error = |message: String| Error::AttributeParse {
        path: path.clone(),
        message,
    };
    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?;
    match value {
        serde_json::Value::Object(model) => Ok(model),
        serde_json::Value::Null => Ok(Model::new()),
        other => Err(parse_error(format!("expected an object, found {other}"))),
    }
}

/// Overwrite the attribute file of `dir` with `model`.
///
/// # Errors
///
/// - [`Error::IllegalState`] if the directory name is blank
/// - [`Error::InvalidArgument`] if `dir` does not exist
pub fn write_resource_file(dir: &Path, model: &Model) -> Result<()> {
    let blank_name = dir
        .file_name()
        .is_none_or(|name| name.to_string_lossy().trim().is_empty());
    if blank_name {
        return Err(Error::illegal_state(format!(
            "Blank resource directory name '{}'",
            dir.display()
        )));
    }
    if !dir.is_dir() {
        return Err(Error::invalid_argument(format!(
            "Directory does not exist: {}",
            dir.display()
        )));
    }

    let path = dir.join(ResourceFile::Attributes);
    let content = serde_json::to_string_pretty(model).map_err(|e| Error::AttributeParse {
        path: path.clone(),
        message: e.to_string(),
    })?;
    io::write_atomic(&path, content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_empty_model() {
        let dir = tempdir().unwrap();
        assert!(read_resource_file(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn write_then_read_keeps_order() {
        let dir = tempdir().unwrap();
        let mut model = Model::new();
        model.insert("zeta".into(), json!(1));
        model.insert("alpha".into(), json!({"nested": [1, 2]}));
        model.insert("undefined".into(), json!(null));

        write_resource_file(dir.path(), &model).unwrap();
        let read = read_resource_file(dir.path()).unwrap();

        assert_eq!(read, model);
        assert_eq!(read.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "undefined"]);
    }

    #[test]
    fn non_object_is_a_parse_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("attributes.dmr"), "[1, 2]").unwrap();
        assert!(matches!(
            read_resource_file(dir.path()),
            Err(Error::AttributeParse { .. })
        ));
    }

    #[test]
    fn attribute_path_must_be_a_file() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("attributes.dmr")).unwrap();
        assert!(matches!(
            read_resource_file(dir.path()),
            Err(Error::IllegalState { .. })
        ));
    }

    #[test]
    fn write_requires_existing_dir() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            write_resource_file(&missing, &Model::new()),
            Err(Error::InvalidArgument { .. })
        ));
    }
}
