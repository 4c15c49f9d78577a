//! Package manifest (`manifest.json`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::PackageError;

pub const MANIFEST_FILE: &str = "manifest.json";

/// The subset of a package manifest the host cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Base application id; instances are `<id>`, `<id>__2`, ...
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    /// Whether more than one instance may be installed at once.
    #[serde(default)]
    pub multi_instance: bool,
}

impl Manifest {
    pub fn parse(data: &str, path: &Path) -> Result<Self, PackageError> {
        let manifest: Manifest =
            serde_json::from_str(data).map_err(|e| PackageError::InvalidManifest {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        manifest.validate(path)?;
        Ok(manifest)
    }

    /// Ids are lowercase ASCII letters, digits and `_`, and may not contain
    /// the `__` instance separator.
    fn validate(&self, path: &Path) -> Result<(), PackageError> {
        let reason = if self.id.is_empty() {
            Some("empty id".to_string())
        } else if !self
            .id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            Some(format!("id '{}' must match [a-z0-9_]+", self.id))
        } else if self.id.contains("__") {
            Some(format!("id '{}' must not contain '__'", self.id))
        } else {
            None
        };
        match reason {
            Some(reason) => Err(PackageError::InvalidManifest {
                path: path.to_path_buf(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_manifest() {
        let m = Manifest::parse(r#"{"id": "register_url_app"}"#, Path::new("m.json")).unwrap();
        assert_eq!(m.id, "register_url_app");
        assert!(m.name.is_none());
        assert!(!m.multi_instance);
    }

    #[test]
    fn parse_full_manifest_ignores_unknown_keys() {
        let json = r#"{
            "id": "wiki",
            "name": "Wiki",
            "version": "2.1",
            "multi_instance": true,
            "maintainer": {"name": "someone"}
        }"#;
        let m = Manifest::parse(json, Path::new("m.json")).unwrap();
        assert_eq!(m.name.as_deref(), Some("Wiki"));
        assert_eq!(m.version.as_deref(), Some("2.1"));
        assert!(m.multi_instance);
    }

    #[test]
    fn invalid_ids_rejected() {
        for id in ["", "Wiki", "my app", "wiki__2"] {
            let json = format!(r#"{{"id": "{id}"}}"#);
            let err = Manifest::parse(&json, Path::new("m.json")).unwrap_err();
            assert!(
                matches!(err, PackageError::InvalidManifest { .. }),
                "id {id:?}"
            );
        }
    }

    #[test]
    fn malformed_json_rejected() {
        let err = Manifest::parse("{not json", Path::new("m.json")).unwrap_err();
        assert!(matches!(err, PackageError::InvalidManifest { .. }));
    }
}
