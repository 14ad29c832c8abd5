//! Resolving logical pack names against the bundler manifest.
//!
//! The [`Manifest`] accessor owns the parsed manifest, decides when it must be reloaded from
//! disk, and optionally runs the compiler before each lookup so development builds stay
//! current without a dev server.

mod data;

use std::collections::BTreeSet;
use std::path::Path;

pub use data::ManifestData;

use crate::compiler::{CommandCompiler, Compiler};
use crate::config::ManifestConfig;
use crate::dev_server::{DevServerProbe, NoDevServer};
use crate::error::ManifestError;
use crate::models::Asset;
use crate::pack_type::PackType;

/// Top-level manifest key holding entrypoint descriptions.
pub const ENTRYPOINTS_KEY: &str = "entrypoints";

/// Key under each entrypoint that maps extensions to chunk paths.
pub const ASSETS_KEY: &str = "assets";

/// Accessor for the bundler manifest.
pub struct Manifest<C = CommandCompiler, D = NoDevServer> {
  config: ManifestConfig,
  compiler: C,
  dev_server: D,
  data: ManifestData,
  loaded: bool,
}

impl<C: Compiler, D: DevServerProbe> Manifest<C, D> {
  /// Create an accessor. Nothing is read from disk until the first lookup.
  pub fn new(config: ManifestConfig, compiler: C, dev_server: D) -> Self {
    Self {
      config,
      compiler,
      dev_server,
      data: ManifestData::default(),
      loaded: false,
    }
  }

  /// Configuration the accessor was created with.
  pub fn config(&self) -> &ManifestConfig {
    &self.config
  }

  /// Manifest contents as last loaded, without triggering a load.
  pub fn data(&self) -> &ManifestData {
    &self.data
  }

  /// Whether lookups will run the compiler first.
  pub fn compiling(&self) -> bool {
    self.config.compile && !self.dev_server.running()
  }

  /// Unconditionally re-read the manifest from disk.
  pub fn refresh(&mut self) -> Result<(), ManifestError> {
    self.reload().map(|_| ())
  }

  /// Resolve an entrypoint's assets of the given type.
  ///
  /// A trailing `.<extension>` matching `pack_type` is stripped from `name` before it is used
  /// as a key under `entrypoints`.
  pub fn lookup_entrypoint(
    &mut self,
    name: &str,
    pack_type: &PackType,
  ) -> Result<Option<Asset>, ManifestError> {
    self.compile_if_needed()?;
    let extension = pack_type.extension();
    let entry = entrypoint_name(name, extension);
    let data = self.get_or_load()?;
    Ok(
      data
        .dig(&[ENTRYPOINTS_KEY, entry, ASSETS_KEY, extension])
        .and_then(Asset::from_value),
    )
  }

  /// Like [`Manifest::lookup_entrypoint`], failing with [`ManifestError::MissingEntry`] when
  /// the entrypoint has no assets of the requested type.
  pub fn lookup_entrypoint_or_fail(
    &mut self,
    name: &str,
    pack_type: &PackType,
  ) -> Result<Asset, ManifestError> {
    match self.lookup_entrypoint(name, pack_type)? {
      Some(asset) => Ok(asset),
      None => Err(self.missing_entry(entrypoint_name(name, pack_type.extension()))),
    }
  }

  /// Resolve a pack by its full file name.
  ///
  /// Names without an extension get `.<extension>` of `pack_type` appended first.
  pub fn lookup(
    &mut self,
    name: &str,
    pack_type: &PackType,
  ) -> Result<Option<Asset>, ManifestError> {
    self.compile_if_needed()?;
    let key = full_pack_name(name, pack_type.extension());
    let data = self.get_or_load()?;
    Ok(data.dig(&[key.as_str()]).and_then(Asset::from_value))
  }

  /// Like [`Manifest::lookup`], failing with [`ManifestError::MissingEntry`] on absence.
  pub fn lookup_or_fail(&mut self, name: &str, pack_type: &PackType) -> Result<Asset, ManifestError> {
    match self.lookup(name, pack_type)? {
      Some(asset) => Ok(asset),
      None => Err(self.missing_entry(&full_pack_name(name, pack_type.extension()))),
    }
  }

  /// Resolve a non-code asset (image, font, ...) whose name already carries its extension.
  ///
  /// The name is used as the manifest key verbatim.
  pub fn asset_path(&mut self, name: &str) -> Result<Asset, ManifestError> {
    self.compile_if_needed()?;
    let asset = self.get_or_load()?.dig(&[name]).and_then(Asset::from_value);
    match asset {
      Some(asset) => Ok(asset),
      None => Err(self.missing_entry(name)),
    }
  }

  /// Collect the chunk paths of several entrypoints, emitting shared chunks only once.
  pub fn entrypoint_sources<'n>(
    &mut self,
    names: impl IntoIterator<Item = &'n str>,
    pack_type: &PackType,
  ) -> Result<Vec<String>, ManifestError> {
    let mut seen = BTreeSet::new();
    let mut sources = Vec::new();

    for name in names {
      let asset = self.lookup_entrypoint_or_fail(name, pack_type)?;
      for path in asset.into_paths() {
        if seen.insert(path.clone()) {
          sources.push(path);
        }
      }
    }

    Ok(sources)
  }

  /// Return the cached manifest, loading it when caching is off or nothing is loaded yet.
  pub fn get_or_load(&mut self) -> Result<&ManifestData, ManifestError> {
    if self.config.cache_manifest && self.loaded {
      return Ok(&self.data);
    }
    self.reload()
  }

  /// Replace the in-memory manifest with the current file contents.
  pub fn reload(&mut self) -> Result<&ManifestData, ManifestError> {
    let path = self.config.resolved_manifest_path();
    self.data = ManifestData::load(&path)?;
    self.loaded = true;
    tracing::debug!(path = %path.display(), entries = self.data.len(), "loaded manifest");
    Ok(&self.data)
  }

  fn compile_if_needed(&self) -> Result<(), ManifestError> {
    if !self.compiling() {
      return Ok(());
    }

    let span = tracing::info_span!("pack_manifest", tag = "compile");
    let _guard = span.enter();
    self.compiler.compile().map_err(ManifestError::Compile)
  }

  fn missing_entry(&self, key: &str) -> ManifestError {
    let manifest_path = self.config.resolved_manifest_path();
    tracing::warn!(key, path = %manifest_path.display(), "manifest entry not found");
    ManifestError::MissingEntry {
      key: key.to_string(),
      manifest_path,
      manifest: self.data.pretty(),
    }
  }
}

impl Manifest {
  /// Accessor using the configured command compiler and no dev server.
  pub fn from_config(config: ManifestConfig) -> Self {
    let compiler = CommandCompiler::from_config(&config);
    Self::new(config, compiler, NoDevServer)
  }
}

/// Strip a trailing `.<extension>` so `calendar.js` names the `calendar` entrypoint.
fn entrypoint_name<'a>(name: &'a str, extension: &str) -> &'a str {
  name
    .strip_suffix(extension)
    .and_then(|stem| stem.strip_suffix('.'))
    .unwrap_or(name)
}

/// Append `.<extension>` unless the name already has one.
fn full_pack_name(name: &str, extension: &str) -> String {
  let has_extension = Path::new(name)
    .extension()
    .is_some_and(|ext| !ext.is_empty());
  if has_extension {
    name.to_string()
  } else {
    format!("{name}.{extension}")
  }
}
