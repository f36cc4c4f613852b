//! Loading raw descriptor entries from JSON or YAML.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{FormError, Result};

/// Parse a JSON document holding a list of raw entries.
pub fn entries_from_json(text: &str) -> Result<Vec<Value>> {
    into_entries(serde_json::from_str(text)?)
}

/// Parse a YAML document holding a list of raw entries.
pub fn entries_from_yaml(text: &str) -> Result<Vec<Value>> {
    into_entries(serde_yaml_ng::from_str(text)?)
}

/// Read raw entries from a file; `.yaml` and `.yml` are read as YAML,
/// anything else as JSON.
pub fn load_entries(path: &Path) -> Result<Vec<Value>> {
    let text = fs::read_to_string(path).map_err(|source| FormError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => entries_from_yaml(&text)?,
        _ => entries_from_json(&text)?,
    };
    debug!(path = %path.display(), count = entries.len(), "loaded raw entries");
    Ok(entries)
}

/// An empty document reads as an empty list.
fn into_entries(document: Value) -> Result<Vec<Value>> {
    match document {
        Value::Array(entries) => Ok(entries),
        Value::Null => Ok(Vec::new()),
        Value::Object(_) => Err(FormError::NotAList { found: "object" }),
        Value::String(_) => Err(FormError::NotAList { found: "string" }),
        Value::Number(_) => Err(FormError::NotAList { found: "number" }),
        Value::Bool(_) => Err(FormError::NotAList { found: "boolean" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn json_list_is_read() {
        let entries = entries_from_json(r#"[{"controlName": "a"}, {"controlName": "b"}]"#).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1], json!({"controlName": "b"}));
    }

    #[test]
    fn yaml_list_is_read() {
        let yaml = r#"
- controlName: age
  value: 0
  validation:
    max: 120
- controlName: intro
  type: placeholder
"#;
        let entries = entries_from_yaml(yaml).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["value"], json!(0));
        assert_eq!(entries[0]["validation"]["max"], json!(120));
    }

    #[test]
    fn null_document_is_empty() {
        assert!(entries_from_json("null").unwrap().is_empty());
    }

    #[test]
    fn object_document_is_rejected() {
        let err = entries_from_json(r#"{"controlName": "a"}"#).unwrap_err();
        assert!(matches!(err, FormError::NotAList { found: "object" }));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(entries_from_json("[").unwrap_err(), FormError::Json(_)));
    }

    #[test]
    fn load_entries_picks_format_by_extension() {
        let dir = TempDir::new().unwrap();
        let yaml_path = dir.path().join("form.yml");
        fs::write(&yaml_path, "- controlName: a\n").unwrap();
        let json_path = dir.path().join("form.json");
        fs::write(&json_path, r#"[{"controlName": "b"}]"#).unwrap();

        assert_eq!(load_entries(&yaml_path).unwrap(), vec![json!({"controlName": "a"})]);
        assert_eq!(load_entries(&json_path).unwrap(), vec![json!({"controlName": "b"})]);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        let err = load_entries(&path).unwrap_err();
        assert!(matches!(err, FormError::Read { .. }));
        assert!(err.to_string().contains("absent.json"));
    }
}
