//! Build toolchain invocation.
//!
//! Runs `<python> setup.py clean -a bdist_egg -d <workspace>` from the project
//! root. The child's output is captured so it never mixes with the archive
//! bytes written to stdout.

use std::ffi::OsString;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, info};

use super::BuildError;
use crate::consts::{DEFAULT_PYTHON, PYTHON_ENV, SETUP_PY};

/// Number of trailing stderr lines kept in [`BuildError::ToolchainFailed`].
const STDERR_TAIL_LINES: usize = 20;

/// The external program that builds the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
  /// Python interpreter (or anything accepting the same arguments)
  pub interpreter: PathBuf,
  /// Arguments placed before `setup.py`
  pub args: Vec<OsString>,
}

impl Default for Toolchain {
  fn default() -> Self {
    Self::new(DEFAULT_PYTHON)
  }
}

impl Toolchain {
  pub fn new(interpreter: impl Into<PathBuf>) -> Self {
    Self {
      interpreter: interpreter.into(),
      args: Vec::new(),
    }
  }

  /// Add arguments passed to the interpreter ahead of `setup.py`.
  pub fn with_args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  /// Interpreter from `EGGPACK_PYTHON`, falling back to `python3`.
  pub fn detect() -> Self {
    match std::env::var_os(PYTHON_ENV) {
      Some(python) if !python.is_empty() => Self::new(python),
      _ => Self::default(),
    }
  }

  /// Full argument list for a clean egg build into `workspace`.
  pub fn build_args(&self, workspace: &Path) -> Vec<OsString> {
    let mut args = self.args.clone();
    args.extend(
      [SETUP_PY, "clean", "-a", "bdist_egg", "-d"]
        .into_iter()
        .map(OsString::from),
    );
    args.push(workspace.as_os_str().to_owned());
    args
  }

  fn command(&self, project_root: &Path, workspace: &Path) -> Command {
    let mut command = Command::new(&self.interpreter);
    command
      .args(self.build_args(workspace))
      .current_dir(project_root)
      .kill_on_drop(true);
    command
  }
}

/// Run `op` until it returns something other than an `Interrupted` error.
///
/// Any other error is returned on its first occurrence.
pub async fn retry_on_interrupt<F, Fut, T>(mut op: F) -> io::Result<T>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = io::Result<T>>,
{
  loop {
    match op().await {
      Err(e) if e.kind() == io::ErrorKind::Interrupted => {
        debug!("interrupted system call, retrying");
        continue;
      }
      result => return result,
    }
  }
}

/// Run the toolchain and wait for it to exit.
///
/// # Errors
///
/// - [`BuildError::Spawn`] if the process cannot be started or awaited
/// - [`BuildError::ToolchainFailed`] if it exits unsuccessfully
pub async fn run_toolchain(toolchain: &Toolchain, project_root: &Path, workspace: &Path) -> Result<(), BuildError> {
  info!(
    interpreter = %toolchain.interpreter.display(),
    project_root = %project_root.display(),
    "running build toolchain"
  );

  let output = retry_on_interrupt(move || async move {
    let mut command = toolchain.command(project_root, workspace);
    command.output().await
  })
  .await
  .map_err(|source| BuildError::Spawn {
    interpreter: toolchain.interpreter.clone(),
    source,
  })?;

  let stdout = String::from_utf8_lossy(&output.stdout);
  let stderr = String::from_utf8_lossy(&output.stderr);

  if !stdout.is_empty() {
    debug!(stdout = %stdout, "toolchain stdout");
  }
  if !stderr.is_empty() {
    debug!(stderr = %stderr, "toolchain stderr");
  }

  if !output.status.success() {
    return Err(BuildError::ToolchainFailed {
      interpreter: toolchain.interpreter.clone(),
      code: output.status.code(),
      stderr: tail_lines(&stderr, STDERR_TAIL_LINES),
    });
  }

  Ok(())
}

fn tail_lines(text: &str, n: usize) -> String {
  let lines: Vec<&str> = text.trim_end().lines().collect();
  lines[lines.len().saturating_sub(n)..].join("\n")
}
