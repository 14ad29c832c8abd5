//! Values resolved from the bundler manifest.

use serde::Serialize;
use serde_json::Value;

/// A resolved manifest entry.
///
/// Direct lookups usually yield a single hashed path, while entrypoint lookups can yield
/// the list of chunks the bundler split the entrypoint into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Asset {
  /// One compiled output path.
  Single(String),
  /// Ordered chunk paths making up an entrypoint.
  Chunks(Vec<String>),
}

impl Asset {
  /// Interpret a raw manifest value.
  ///
  /// Only non-empty strings and non-empty arrays made entirely of strings are recognised;
  /// anything else is reported as absent.
  pub fn from_value(value: &Value) -> Option<Self> {
    match value {
      Value::String(path) if path.is_empty() => None,
      Value::String(path) => Some(Self::Single(path.clone())),
      Value::Array(items) if items.is_empty() => None,
      Value::Array(items) => items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .map(Self::Chunks),
      _ => None,
    }
  }

  /// Every path referenced by this entry, in manifest order.
  pub fn paths(&self) -> impl Iterator<Item = &str> {
    let slice: &[String] = match self {
      Self::Single(path) => std::slice::from_ref(path),
      Self::Chunks(paths) => paths,
    };
    slice.iter().map(String::as_str)
  }

  /// Consume the entry, returning its paths.
  pub fn into_paths(self) -> Vec<String> {
    match self {
      Self::Single(path) => vec![path],
      Self::Chunks(paths) => paths,
    }
  }
}
