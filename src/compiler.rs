//! Triggering the external bundler before manifest lookups.

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use anyhow::{Context, Result, anyhow};

use crate::config::ManifestConfig;

/// Runs the external build that (re)writes the manifest.
///
/// Implementations block until the build has finished. Errors are passed through to the
/// caller of the lookup unchanged.
pub trait Compiler {
  /// Compile the assets.
  fn compile(&self) -> Result<()>;
}

impl<F> Compiler for F
where
  F: Fn() -> Result<()>,
{
  fn compile(&self) -> Result<()> {
    self()
  }
}

/// Compiler that spawns a configured command, e.g. `bin/webpack`.
///
/// The process output is forwarded to the log line by line while the build runs.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
  command: Vec<String>,
  env: BTreeMap<String, String>,
  working_dir: PathBuf,
}

impl CommandCompiler {
  /// Build a compiler from the `compiler_command`, `compiler_env` and root of a configuration.
  ///
  /// An empty command is only reported when a compile is actually attempted, so
  /// configurations with compilation disabled need not name a program.
  pub fn from_config(config: &ManifestConfig) -> Self {
    Self {
      command: config.compiler_command.clone(),
      env: config.compiler_env.clone(),
      working_dir: config.root.clone(),
    }
  }
}

impl Compiler for CommandCompiler {
  fn compile(&self) -> Result<()> {
    let (program, args) = self
      .command
      .split_first()
      .ok_or_else(|| anyhow!("compiler_command must name a program"))?;
    tracing::info!(program = %program, args = ?args, "compiling assets");

    let mut child = Command::new(program)
      .args(args)
      .envs(&self.env)
      .current_dir(&self.working_dir)
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
      .with_context(|| format!("failed to run `{program}`"))?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let span = tracing::Span::current();
    let stderr_lines = thread::scope(|scope| {
      let errors = scope.spawn(move || {
        let _guard = span.enter();
        let mut lines = Vec::new();
        if let Some(stderr) = stderr {
          for line in BufReader::new(stderr).lines().map_while(|line| line.ok()) {
            tracing::warn!("{line}");
            lines.push(line);
          }
        }
        lines
      });

      if let Some(stdout) = stdout {
        for line in BufReader::new(stdout).lines().map_while(|line| line.ok()) {
          tracing::info!("{line}");
        }
      }

      errors.join().unwrap_or_default()
    });

    let status = child
      .wait()
      .with_context(|| format!("failed to wait for `{program}`"))?;
    if !status.success() {
      return Err(anyhow!(
        "`{program}` failed with status {status}: {}",
        stderr_lines.join("\n").trim()
      ));
    }

    tracing::info!("compilation finished");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  fn config_with(command: &[&str]) -> ManifestConfig {
    ManifestConfig {
      compiler_command: command.iter().map(|part| part.to_string()).collect(),
      ..ManifestConfig::default()
    }
  }

  #[test]
  fn rejects_empty_command_when_compiling() {
    let err = CommandCompiler::from_config(&config_with(&[])).compile().unwrap_err();
    assert!(err.to_string().contains("compiler_command"));
  }

  #[test]
  fn reports_missing_programs() {
    let compiler =
      CommandCompiler::from_config(&config_with(&["definitely-not-a-real-bundler-binary"]));
    let err = compiler.compile().unwrap_err();
    assert!(err.to_string().contains("failed to run"));
  }

  #[cfg(unix)]
  #[test]
  fn runs_command_in_project_root_with_env() {
    let temp = tempdir().unwrap();
    let mut config = config_with(&["sh", "-c", "printf '%s' \"$PACK_MODE\" > built.txt"]);
    config.compiler_env.insert("PACK_MODE".into(), "development".into());
    let config = config.with_root(temp.path());

    CommandCompiler::from_config(&config).compile().unwrap();

    let written = std::fs::read_to_string(temp.path().join("built.txt")).unwrap();
    assert_eq!(written, "development");
  }

  #[cfg(unix)]
  #[test]
  fn surfaces_non_zero_exit_status() {
    let temp = tempdir().unwrap();
    let config = config_with(&["sh", "-c", "echo broken >&2; exit 3"]).with_root(temp.path());

    let err = CommandCompiler::from_config(&config).compile().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("failed with status"));
    assert!(message.contains("broken"));
  }

  #[cfg(unix)]
  #[test]
  fn drains_interleaved_output_streams() {
    let temp = tempdir().unwrap();
    let config = config_with(&[
      "sh",
      "-c",
      "i=0; while [ $i -lt 2000 ]; do echo out $i; echo err $i >&2; i=$((i+1)); done; touch done.txt",
    ])
    .with_root(temp.path());

    CommandCompiler::from_config(&config).compile().unwrap();
    assert!(temp.path().join("done.txt").exists());
  }
}
