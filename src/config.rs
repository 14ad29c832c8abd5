//! Project configuration describing where the manifest lives and how lookups behave.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// File searched for by [`ManifestConfig::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "packs.config.json";

/// Settings consumed by the manifest accessor and the default compiler.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
  /// Location of the bundler manifest.
  pub manifest_path: PathBuf,
  /// Keep the manifest in memory between lookups instead of re-reading it every time.
  pub cache_manifest: bool,
  /// Run the compiler before lookups when no dev server is serving assets.
  pub compile: bool,
  /// Program and arguments used by [`crate::compiler::CommandCompiler`].
  pub compiler_command: Vec<String>,
  /// Extra environment variables passed to the compiler process.
  pub compiler_env: BTreeMap<String, String>,
  /// Directory the compiler runs in. Relative paths are resolved against it.
  #[serde(skip)]
  pub root: PathBuf,
}

impl Default for ManifestConfig {
  fn default() -> Self {
    Self {
      manifest_path: PathBuf::from("public/packs/manifest.json"),
      cache_manifest: false,
      compile: true,
      compiler_command: vec!["bin/webpack".into()],
      compiler_env: BTreeMap::new(),
      root: PathBuf::from("."),
    }
  }
}

impl ManifestConfig {
  /// Attempt to load configuration from the provided project root.
  ///
  /// A missing or unparsable configuration file falls back to the defaults so lookups can
  /// still run against the conventional manifest location.
  pub fn discover(root: &Path) -> Self {
    let candidate = root.join(DEFAULT_CONFIG_FILE);
    match Self::from_path(&candidate) {
      Ok(config) => config,
      Err(err) => {
        if candidate.exists() {
          tracing::warn!(error = %err, "ignoring unusable pack configuration");
        }
        Self::default().with_root(root)
      }
    }
  }

  /// Read configuration from a specific file.
  ///
  /// Files ending in `.yml` or `.yaml` are parsed as YAML, everything else as JSON. The
  /// directory containing the file becomes the project root.
  pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let config: Self = if is_yaml(path) {
      serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
      })?
    } else {
      serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
      })?
    };

    let root = path
      .parent()
      .filter(|parent| !parent.as_os_str().is_empty())
      .unwrap_or(Path::new("."));
    Ok(config.with_root(root))
  }

  /// Load configuration for the project at `root`.
  ///
  /// An explicit file may live anywhere (e.g. `config/packs.json`); relative paths in it are
  /// still resolved against `root`. Without one, [`ManifestConfig::discover`] is used.
  pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
    match explicit {
      Some(path) => Ok(Self::from_path(path)?.with_root(root)),
      None => Ok(Self::discover(root)),
    }
  }

  /// Set the project root used to resolve relative paths.
  pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
    self.root = root.into();
    self
  }

  /// Absolute (or root-relative) location of the manifest file.
  pub fn resolved_manifest_path(&self) -> PathBuf {
    self.root.join(&self.manifest_path)
  }
}

fn is_yaml(path: &Path) -> bool {
  matches!(
    path.extension().and_then(|ext| ext.to_str()),
    Some("yml" | "yaml")
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn defaults_follow_conventional_layout() {
    let config = ManifestConfig::default();
    assert_eq!(config.manifest_path, PathBuf::from("public/packs/manifest.json"));
    assert!(!config.cache_manifest);
    assert!(config.compile);
    assert_eq!(config.compiler_command, vec!["bin/webpack".to_string()]);
  }

  #[test]
  fn discover_falls_back_to_defaults_when_missing() {
    let temp = tempdir().unwrap();
    let config = ManifestConfig::discover(temp.path());

    assert_eq!(config.root, temp.path());
    assert_eq!(
      config.resolved_manifest_path(),
      temp.path().join("public/packs/manifest.json")
    );
  }

  #[test]
  fn discover_falls_back_to_defaults_when_malformed() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "{ not json").unwrap();

    let config = ManifestConfig::discover(temp.path());
    assert_eq!(config, ManifestConfig::default().with_root(temp.path()));
  }

  #[test]
  fn reads_partial_json_configuration() {
    let temp = tempdir().unwrap();
    fs::write(
      temp.path().join(DEFAULT_CONFIG_FILE),
      r#"{"manifest_path": "build/manifest.json", "cache_manifest": true}"#,
    )
    .unwrap();

    let config = ManifestConfig::discover(temp.path());
    assert!(config.cache_manifest);
    assert!(config.compile);
    assert_eq!(
      config.resolved_manifest_path(),
      temp.path().join("build/manifest.json")
    );
  }

  #[test]
  fn reads_yaml_configuration() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("packs.yml");
    fs::write(
      &path,
      "compile: false\ncompiler_command: [\"npx\", \"webpack\"]\ncompiler_env:\n  NODE_ENV: development\n",
    )
    .unwrap();

    let config = ManifestConfig::from_path(&path).unwrap();
    assert!(!config.compile);
    assert_eq!(config.compiler_command, vec!["npx".to_string(), "webpack".to_string()]);
    assert_eq!(
      config.compiler_env.get("NODE_ENV").map(String::as_str),
      Some("development")
    );
    assert_eq!(config.root, temp.path());
  }

  #[test]
  fn explicit_config_in_subdirectory_keeps_project_root() {
    let temp = tempdir().unwrap();
    let config_dir = temp.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    let path = config_dir.join("packs.json");
    fs::write(&path, r#"{"compile": false}"#).unwrap();

    let config = ManifestConfig::load(temp.path(), Some(path.as_path())).unwrap();
    assert!(!config.compile);
    assert_eq!(config.root, temp.path());
    assert_eq!(
      config.resolved_manifest_path(),
      temp.path().join("public/packs/manifest.json")
    );
  }

  #[test]
  fn load_without_explicit_file_discovers() {
    let temp = tempdir().unwrap();
    let config = ManifestConfig::load(temp.path(), None).unwrap();
    assert_eq!(config, ManifestConfig::default().with_root(temp.path()));
  }

  #[test]
  fn from_path_reports_parse_errors() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("packs.json");
    fs::write(&path, "[]").unwrap();

    let err = ManifestConfig::from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Json { .. }));
  }
}
