//! In-memory copy of the bundler manifest.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::ManifestError;

/// Parsed manifest contents. Replaced wholesale on reload, never patched in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestData {
  entries: Map<String, Value>,
}

impl ManifestData {
  /// Load the manifest from disk.
  ///
  /// A manifest that has not been written yet loads as an empty mapping so lookups resolve
  /// as absent. Unreadable files and documents that are not a JSON object are errors.
  pub fn load(path: &Path) -> Result<Self, ManifestError> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(err) if err.kind() == ErrorKind::NotFound => {
        tracing::debug!(path = %path.display(), "manifest not found, using empty mapping");
        return Ok(Self::default());
      }
      Err(source) => {
        return Err(ManifestError::Read {
          path: path.to_path_buf(),
          source,
        });
      }
    };

    let entries = serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    Ok(Self { entries })
  }

  /// Follow `keys` through nested objects.
  ///
  /// Returns `None` as soon as a key is missing or an intermediate value is not an object.
  pub fn dig(&self, keys: &[&str]) -> Option<&Value> {
    let (first, rest) = keys.split_first()?;
    rest
      .iter()
      .try_fold(self.entries.get(*first)?, |value, key| value.as_object()?.get(*key))
  }

  /// Number of top-level entries.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns `true` when the manifest has no entries.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Pretty-printed JSON of the whole manifest, for diagnostics.
  pub fn pretty(&self) -> String {
    serde_json::to_string_pretty(&self.entries).unwrap_or_else(|_| format!("{:?}", self.entries))
  }
}

impl From<Map<String, Value>> for ManifestData {
  fn from(entries: Map<String, Value>) -> Self {
    Self { entries }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use tempfile::tempdir;

  fn data(value: Value) -> ManifestData {
    match value {
      Value::Object(map) => ManifestData::from(map),
      other => panic!("expected object, got {other}"),
    }
  }

  #[test]
  fn missing_file_loads_empty_mapping() {
    let temp = tempdir().unwrap();
    let data = ManifestData::load(&temp.path().join("manifest.json")).unwrap();
    assert!(data.is_empty());
  }

  #[test]
  fn rejects_malformed_json() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("manifest.json");
    fs::write(&path, "{\"app.js\": ").unwrap();

    let err = ManifestData::load(&path).unwrap_err();
    assert!(matches!(err, ManifestError::Parse { .. }));
  }

  #[test]
  fn reports_unreadable_manifests() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("manifest.json");
    fs::create_dir_all(&path).unwrap();

    assert!(matches!(ManifestData::load(&path), Err(ManifestError::Read { .. })));
  }

  #[test]
  fn rejects_non_object_documents() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("manifest.json");
    fs::write(&path, "[\"app.js\"]").unwrap();

    assert!(matches!(ManifestData::load(&path), Err(ManifestError::Parse { .. })));
  }

  #[test]
  fn digs_through_nested_objects() {
    let data = data(json!({
      "entrypoints": {"app": {"assets": {"js": ["/packs/app.js"]}}}
    }));

    assert_eq!(
      data.dig(&["entrypoints", "app", "assets", "js"]),
      Some(&json!(["/packs/app.js"]))
    );
    assert_eq!(data.dig(&["entrypoints", "app", "assets", "css"]), None);
    assert_eq!(data.dig(&["entrypoints", "missing", "assets"]), None);
    assert_eq!(data.dig(&[]), None);
  }

  #[test]
  fn non_object_intermediates_resolve_as_absent() {
    let data = data(json!({
      "entrypoints": {"app": "/packs/app.js"}
    }));

    assert_eq!(data.dig(&["entrypoints", "app", "assets", "js"]), None);
  }

  #[test]
  fn pretty_dump_contains_entries() {
    let data = data(json!({"app.js": "/packs/app-1.js"}));
    let dump = data.pretty();
    assert!(dump.contains("\"app.js\": \"/packs/app-1.js\""));
    assert_eq!(data.len(), 1);
  }
}
