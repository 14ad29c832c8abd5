//! Console logging for the command-line tool.

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "pack_manifest=info,warn";

/// Install a stderr subscriber. `verbose` raises the crate's level to `debug`.
///
/// Logs go to stderr so resolved paths on stdout stay pipeable.
pub fn init(verbose: bool) -> anyhow::Result<()> {
  let filter = match EnvFilter::try_from_default_env() {
    Ok(filter) => filter,
    Err(_) if verbose => EnvFilter::new("pack_manifest=debug,info"),
    Err(_) => EnvFilter::new(DEFAULT_FILTER),
  };

  let console_layer = fmt::layer()
    .with_target(false)
    .with_level(true)
    .with_writer(std::io::stderr)
    .with_filter(filter);

  tracing_subscriber::registry()
    .with(console_layer)
    .try_init()?;
  Ok(())
}
