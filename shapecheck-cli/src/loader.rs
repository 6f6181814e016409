//! Reading schema descriptors and data documents from disk.

use std::fs;
use std::path::Path;

use shapecheck::{Type, Value, descriptor};
use tracing::debug;

use crate::error::LoadError;

/// Read a JSON file.
fn read_json(path: &Path) -> Result<serde_json::Value, LoadError> {
    let content = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| LoadError::json(path, e))
}

/// Load and build the schema described by the JSON file at `path`.
pub fn load_schema(path: &Path) -> Result<Type, LoadError> {
    let raw = read_json(path)?;
    let ty = descriptor::from_json(&raw).map_err(|e| LoadError::schema(path, e))?;
    debug!(path = %path.display(), root = ty.name(), "Loaded schema");
    Ok(ty)
}

/// Load a JSON document as a dynamic value.
pub fn load_document(path: &Path) -> Result<Value, LoadError> {
    let value = Value::from(read_json(path)?);
    debug!(path = %path.display(), kind = value.kind(), "Loaded document");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_schema_and_document() {
        let dir = TempDir::new().unwrap();
        let schema = dir.path().join("schema.json");
        let data = dir.path().join("data.json");
        fs::write(&schema, r#"{"type": "list", "items": {"type": "integer"}}"#).unwrap();
        fs::write(&data, "[1, 2]").unwrap();

        let ty = load_schema(&schema).unwrap();
        assert_eq!(ty.name(), "list");
        let value = load_document(&data).unwrap();
        assert!(ty.parse(&value).is_ok());
    }

    #[test]
    fn test_missing_and_malformed_files() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(load_document(&missing), Err(LoadError::Io { .. })));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{").unwrap();
        assert!(matches!(load_document(&broken), Err(LoadError::Json { .. })));
    }

    #[test]
    fn test_rejected_descriptor() {
        let dir = TempDir::new().unwrap();
        let schema = dir.path().join("schema.json");
        fs::write(&schema, r#"{"type": "integer", "minimum": 1}"#).unwrap();
        assert!(matches!(load_schema(&schema), Err(LoadError::Schema { .. })));
    }
}
