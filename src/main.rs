use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use pack_manifest::{
  Asset, CommandCompiler, DevServerStatus, Manifest, ManifestConfig, PackType, logging,
};

/// Resolve logical pack names to compiled, content-hashed paths.
#[derive(Debug, Parser)]
#[command(name = "pack-manifest", version)]
struct Cli {
  /// Project root containing `packs.config.json`.
  #[arg(long, default_value = ".")]
  root: PathBuf,
  /// Explicit configuration file (JSON, or YAML for `.yml`/`.yaml`). Paths in it are
  /// resolved against `--root`.
  #[arg(long)]
  config: Option<PathBuf>,
  /// Never run the compiler before lookups.
  #[arg(long)]
  no_compile: bool,
  /// Treat a dev server as running, which also disables compilation.
  #[arg(long)]
  dev_server_running: bool,
  /// Print results as JSON.
  #[arg(long)]
  json: bool,
  /// Enable debug logging.
  #[arg(short, long)]
  verbose: bool,
  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Look up a pack by file name, appending the type's extension when missing.
  Lookup {
    /// Pack name such as `application` or `application.js`.
    name: String,
    /// Pack type: `javascript`, `stylesheet` or a raw extension.
    #[arg(long = "type", default_value = "javascript")]
    pack_type: PackType,
  },
  /// Look up the assets of an entrypoint.
  Entrypoint {
    /// Entrypoint name.
    name: String,
    /// Pack type: `javascript`, `stylesheet` or a raw extension.
    #[arg(long = "type", default_value = "javascript")]
    pack_type: PackType,
  },
  /// Merge the chunks of several entrypoints, listing shared chunks once.
  Sources {
    /// Entrypoint names.
    #[arg(required = true)]
    names: Vec<String>,
    /// Pack type: `javascript`, `stylesheet` or a raw extension.
    #[arg(long = "type", default_value = "javascript")]
    pack_type: PackType,
  },
  /// Look up a static asset such as an image by its exact manifest key.
  Asset {
    /// Asset name including its extension.
    name: String,
  },
  /// Print the manifest contents.
  Dump,
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  logging::init(cli.verbose)?;

  let mut config = ManifestConfig::load(&cli.root, cli.config.as_deref()).with_context(|| {
    format!(
      "failed to load configuration from {}",
      cli.config.as_deref().unwrap_or(cli.root.as_path()).display()
    )
  })?;
  if cli.no_compile {
    config.compile = false;
  }

  let compiler = CommandCompiler::from_config(&config);
  let dev_server = DevServerStatus {
    running: cli.dev_server_running,
  };
  let mut manifest = Manifest::new(config, compiler, dev_server);

  match cli.command {
    Command::Lookup { name, pack_type } => {
      let asset = manifest.lookup_or_fail(&name, &pack_type)?;
      print_asset(&asset, cli.json)?;
    }
    Command::Entrypoint { name, pack_type } => {
      let asset = manifest.lookup_entrypoint_or_fail(&name, &pack_type)?;
      print_asset(&asset, cli.json)?;
    }
    Command::Sources { names, pack_type } => {
      let sources = manifest.entrypoint_sources(names.iter().map(String::as_str), &pack_type)?;
      print_asset(&Asset::Chunks(sources), cli.json)?;
    }
    Command::Asset { name } => {
      let asset = manifest.asset_path(&name)?;
      print_asset(&asset, cli.json)?;
    }
    Command::Dump => {
      manifest.refresh()?;
      println!("{}", manifest.data().pretty());
    }
  }

  Ok(())
}

fn print_asset(asset: &Asset, json: bool) -> Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(asset)?);
  } else {
    for path in asset.paths() {
      println!("{path}");
    }
  }
  Ok(())
}
