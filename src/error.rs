//! Error types surfaced by manifest and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while resolving manifest entries.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// The manifest exists but could not be read.
  #[error("failed to read manifest {}", .path.display())]
  Read {
    /// Manifest path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: std::io::Error,
  },
  /// The manifest is not a JSON object.
  #[error("failed to parse manifest {}", .path.display())]
  Parse {
    /// Manifest path that caused the error.
    path: PathBuf,
    /// Source parse error.
    #[source]
    source: serde_json::Error,
  },
  /// The on-demand compile step failed; the compiler's error is passed through as-is.
  #[error(transparent)]
  Compile(anyhow::Error),
  /// A required entry is not present in the manifest.
  #[error(
    "can't find {key} in {}. Possible causes:\n\
     1. Compilation is disabled for this environment and no watcher or dev server is running.\n\
     2. The bundler has not yet re-run to reflect recent changes.\n\
     3. The manifest path is misconfigured.\n\
     4. The bundler configuration does not emit a manifest.\n\
     Your manifest contains:\n{manifest}",
    .manifest_path.display()
  )]
  MissingEntry {
    /// Manifest key (or entrypoint name) that could not be resolved.
    key: String,
    /// Manifest file that was consulted.
    manifest_path: PathBuf,
    /// Pretty-printed manifest contents at the time of the lookup.
    manifest: String,
  },
}

/// Failures raised while loading an explicit configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// Failed to read the configuration file from disk.
  #[error("failed to read {}", .path.display())]
  Read {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: std::io::Error,
  },
  /// Failed to parse a JSON configuration file.
  #[error("failed to parse {}", .path.display())]
  Json {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    #[source]
    source: serde_json::Error,
  },
  /// Failed to parse a YAML configuration file.
  #[error("failed to parse {}", .path.display())]
  Yaml {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    #[source]
    source: serde_yaml::Error,
  },
}
