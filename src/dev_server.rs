//! Reporting whether a live dev server is already serving compiled assets.

/// Answers whether a dev server is currently running.
///
/// When one is, it keeps the manifest up to date itself and on-demand compilation is skipped.
pub trait DevServerProbe {
  /// Returns `true` when a dev server is serving assets.
  fn running(&self) -> bool;
}

/// Probe for setups that never run a dev server.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDevServer;

impl DevServerProbe for NoDevServer {
  fn running(&self) -> bool {
    false
  }
}

/// Probe reporting a fixed answer, e.g. from a command-line flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct DevServerStatus {
  /// Whether the dev server is considered running.
  pub running: bool,
}

impl DevServerProbe for DevServerStatus {
  fn running(&self) -> bool {
    self.running
  }
}

impl<F> DevServerProbe for F
where
  F: Fn() -> bool,
{
  fn running(&self) -> bool {
    self()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::Cell;

  #[test]
  fn closures_are_queried_on_every_call() {
    let calls = Cell::new(0);
    let probe = || {
      calls.set(calls.get() + 1);
      calls.get() > 1
    };

    assert!(!probe.running());
    assert!(probe.running());
  }

  #[test]
  fn static_probes_report_fixed_state() {
    assert!(!NoDevServer.running());
    assert!(DevServerStatus { running: true }.running());
    assert!(!DevServerStatus::default().running());
  }
}
