//! Error types for dynaform
//!
//! The engine itself never fails on malformed descriptors; every missing or
//! partial field resolves to a default. Errors only arise at the edges, when
//! raw descriptor text is read and parsed.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for dynaform operations
pub type Result<T> = std::result::Result<T, FormError>;

/// Errors that can occur while loading raw descriptor entries
#[derive(Debug, Error)]
pub enum FormError {
    /// The top-level document is not a list of entries
    #[error("descriptor input must be a list of entries, found {found}")]
    NotAList { found: &'static str },

    /// Descriptor file could not be read
    #[error("failed to read descriptor file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON parse error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_a_list_display() {
        let err = FormError::NotAList { found: "object" };
        assert_eq!(
            err.to_string(),
            "descriptor input must be a list of entries, found object"
        );
    }

    #[test]
    fn test_read_error_names_path() {
        let err = FormError::Read {
            path: PathBuf::from("forms/signup.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("forms/signup.json"));
        assert!(err.to_string().contains("missing"));
    }
}
