//! Building the egg archive.
//!
//! A build prepares `setup.py` in the project root, runs the toolchain with a
//! fresh temporary workspace as its output directory, and locates the single
//! archive it produced. The project root is passed to every step explicitly;
//! the process working directory is never changed, so builds of different
//! projects can run side by side.
//!
//! # Stages
//!
//! ```text
//! NotStarted → WorkspaceCreated → ToolchainInvoked → ArtifactLocated → Done
//!      └──────────────┴──────────────────┴─────────────────┴──→ Failed
//! ```

mod locate;
mod toolchain;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, info};

use crate::consts::{SETUP_PY, WORKSPACE_PREFIX};
use crate::descriptor::{DescriptorError, ResolvedSettings, read_descriptor, validate_descriptor_path};
use crate::setup::{BackupPolicy, SetupError, preserve_existing, write_setup_py};

pub use locate::locate_archive;
pub use toolchain::{Toolchain, retry_on_interrupt, run_toolchain};

/// Errors that can occur while building the archive.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error(transparent)]
  Descriptor(#[from] DescriptorError),

  #[error(transparent)]
  Setup(#[from] SetupError),

  #[error("failed to create build workspace in {}: {source}", root.display())]
  Workspace { root: PathBuf, source: io::Error },

  #[error("failed to run build toolchain {}: {source}", interpreter.display())]
  Spawn { interpreter: PathBuf, source: io::Error },

  #[error("build toolchain {} {}{}", interpreter.display(), describe_exit(*code), stderr_suffix(stderr))]
  ToolchainFailed {
    interpreter: PathBuf,
    code: Option<i32>,
    stderr: String,
  },

  #[error("no .egg archive was produced in {}", workspace.display())]
  ArchiveNotFound { workspace: PathBuf },

  #[error("expected one .egg archive in {}, found {}", workspace.display(), found.len())]
  MultipleArchives { workspace: PathBuf, found: Vec<PathBuf> },
}

fn describe_exit(code: Option<i32>) -> String {
  match code {
    Some(code) => format!("exited with code {code}"),
    None => "was terminated by a signal".to_string(),
  }
}

fn stderr_suffix(stderr: &str) -> String {
  if stderr.is_empty() {
    String::new()
  } else {
    format!(":\n{stderr}")
  }
}

/// Progress of a single build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
  NotStarted,
  WorkspaceCreated,
  ToolchainInvoked,
  ArtifactLocated,
  Done,
  Failed,
}

impl fmt::Display for BuildStage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      BuildStage::NotStarted => "not-started",
      BuildStage::WorkspaceCreated => "workspace-created",
      BuildStage::ToolchainInvoked => "toolchain-invoked",
      BuildStage::ArtifactLocated => "artifact-located",
      BuildStage::Done => "done",
      BuildStage::Failed => "failed",
    };
    f.write_str(name)
  }
}

/// Options for a single build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
  /// Path to the project's `scrapy.cfg`
  pub descriptor: PathBuf,
  /// Key looked up under `[settings]` before `default`
  pub project: Option<String>,
  pub toolchain: Toolchain,
  /// How an existing `setup.py` is preserved
  pub backup: BackupPolicy,
  /// Build with the project's own `setup.py` when it has one
  pub reuse_existing_setup: bool,
  /// Parent directory for the workspace (defaults to the system temp dir)
  pub workspace_root: Option<PathBuf>,
}

impl BuildOptions {
  /// Defaults for `descriptor`, with the toolchain taken from the environment.
  pub fn new(descriptor: impl Into<PathBuf>) -> Self {
    Self {
      descriptor: descriptor.into(),
      project: None,
      toolchain: Toolchain::detect(),
      backup: BackupPolicy::default(),
      reuse_existing_setup: false,
      workspace_root: None,
    }
  }
}

/// Temporary directory receiving the toolchain output.
///
/// Removed when dropped; [`BuildWorkspace::remove`] reports removal errors.
#[derive(Debug)]
pub struct BuildWorkspace {
  dir: TempDir,
}

impl BuildWorkspace {
  /// Create a uniquely named workspace under `root`, or the system temp dir.
  ///
  /// # Errors
  ///
  /// Returns [`BuildError::Workspace`] if the directory cannot be created.
  pub fn create(root: Option<&Path>) -> Result<Self, BuildError> {
    let root = match root {
      Some(root) => std::path::absolute(root).map_err(|source| BuildError::Workspace {
        root: root.to_path_buf(),
        source,
      })?,
      None => std::env::temp_dir(),
    };

    let dir = tempfile::Builder::new()
      .prefix(WORKSPACE_PREFIX)
      .tempdir_in(&root)
      .map_err(|source| BuildError::Workspace { root, source })?;

    Ok(Self { dir })
  }

  pub fn path(&self) -> &Path {
    self.dir.path()
  }

  /// Delete the workspace and everything left in it.
  pub fn remove(self) -> io::Result<()> {
    self.dir.close()
  }
}

/// A located archive together with the workspace that holds it.
#[derive(Debug)]
pub struct BuiltArtifact {
  /// Absolute path of the `.egg` file
  pub archive: PathBuf,
  pub workspace: BuildWorkspace,
  pub settings: ResolvedSettings,
  /// Where an existing `setup.py` was copied, if anywhere
  pub backup: Option<PathBuf>,
}

/// Build the egg for the project described by `options.descriptor`.
///
/// Configuration problems are reported before any workspace is created or the
/// toolchain is started. An existing `setup.py` is preserved before it is
/// replaced, even when the build later fails.
///
/// # Errors
///
/// Returns a [`BuildError`] describing the first failure; nothing is retried
/// except interrupted system calls while running the toolchain.
pub async fn build_archive(options: &BuildOptions) -> Result<BuiltArtifact, BuildError> {
  let mut stage = BuildStage::NotStarted;

  let result = run_build(options, &mut stage).await;
  if let Err(err) = &result {
    debug!(last_stage = %stage, error = %err, "build failed");
    advance(&mut stage, BuildStage::Failed);
  }
  result
}

async fn run_build(options: &BuildOptions, stage: &mut BuildStage) -> Result<BuiltArtifact, BuildError> {
  let descriptor_path = validate_descriptor_path(&options.descriptor)?;
  let project_root = descriptor_path
    .parent()
    .map(Path::to_path_buf)
    .unwrap_or_else(|| PathBuf::from("."));
  let setup_py = project_root.join(SETUP_PY);

  let reuse = options.reuse_existing_setup && setup_py.is_file();
  let backup = if reuse {
    None
  } else {
    preserve_existing(&setup_py, options.backup)?
  };

  let descriptor = read_descriptor(&descriptor_path)?;
  let settings = descriptor.resolve_settings(options.project.as_deref())?;

  if reuse {
    info!(path = %setup_py.display(), "using the project's own setup.py");
  } else {
    write_setup_py(&project_root, &settings.module)?;
  }

  let workspace = BuildWorkspace::create(options.workspace_root.as_deref())?;
  advance(stage, BuildStage::WorkspaceCreated);
  debug!(workspace = %workspace.path().display(), "created build workspace");

  run_toolchain(&options.toolchain, &project_root, workspace.path()).await?;
  advance(stage, BuildStage::ToolchainInvoked);

  let archive = locate_archive(workspace.path())?;
  advance(stage, BuildStage::ArtifactLocated);

  info!(
    archive = %archive.display(),
    settings = %settings.module,
    "built archive"
  );
  advance(stage, BuildStage::Done);

  Ok(BuiltArtifact {
    archive,
    workspace,
    settings,
    backup,
  })
}

fn advance(stage: &mut BuildStage, next: BuildStage) {
  debug!(from = %stage, to = %next, "build stage");
  *stage = next;
}
