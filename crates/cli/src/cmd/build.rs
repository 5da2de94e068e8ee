//! Implementation of the `eggpack build` command.
//!
//! Builds the project's egg and writes the raw archive bytes to stdout, or to
//! a file with `--out`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tempfile::NamedTempFile;
use tokio::runtime::Runtime;
use tracing::debug;

use eggpack_lib::build::{BuildOptions, Toolchain};
use eggpack_lib::consts::{DEFAULT_PYTHON, PYTHON_ENV};
use eggpack_lib::package::{PackageSummary, package};
use eggpack_lib::setup::BackupPolicy;

use crate::output::{Status, format_elapsed, format_size, print_status};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum BackupArg {
  /// Keep one setup_backup.py, replaced on every build
  #[default]
  Single,
  /// Keep every backup as setup_backup.<n>.py
  Numbered,
}

impl From<BackupArg> for BackupPolicy {
  fn from(arg: BackupArg) -> Self {
    match arg {
      BackupArg::Single => BackupPolicy::Single,
      BackupArg::Numbered => BackupPolicy::Numbered,
    }
  }
}

#[derive(Debug, Args)]
pub struct BuildArgs {
  /// Path to the project's scrapy.cfg
  pub config: PathBuf,

  /// Python interpreter used to run setup.py
  #[arg(long, env = PYTHON_ENV, default_value = DEFAULT_PYTHON)]
  pub python: PathBuf,

  /// Extra argument passed to the interpreter before setup.py (repeatable)
  #[arg(long = "python-arg", value_name = "ARG", allow_hyphen_values = true)]
  pub python_args: Vec<String>,

  /// Project key looked up in the [settings] section before `default`
  #[arg(long, env = "SCRAPY_PROJECT")]
  pub project: Option<String>,

  /// How an existing setup.py is preserved before it is replaced
  #[arg(long, value_enum, default_value_t)]
  pub backup: BackupArg,

  /// Build with the project's own setup.py if it has one
  #[arg(long)]
  pub reuse_setup_py: bool,

  /// Directory in which the temporary build workspace is created
  #[arg(long, env = "EGGPACK_WORKSPACE_DIR")]
  pub workspace_dir: Option<PathBuf>,

  /// Write the egg to this file instead of stdout
  #[arg(short, long)]
  pub out: Option<PathBuf>,
}

impl BuildArgs {
  fn to_options(&self) -> BuildOptions {
    BuildOptions {
      descriptor: self.config.clone(),
      project: self.project.clone(),
      toolchain: Toolchain::new(&self.python).with_args(&self.python_args),
      backup: self.backup.into(),
      reuse_existing_setup: self.reuse_setup_py,
      workspace_root: self.workspace_dir.clone(),
    }
  }
}

/// Execute the build command.
///
/// Runs the whole packaging pipeline on a single-threaded runtime. With
/// `--out`, the egg is written to a temporary file next to the target and
/// only moved into place after a successful build.
///
/// # Errors
///
/// Returns an error if the descriptor is invalid, the toolchain fails, the
/// archive cannot be located, or the output cannot be written.
pub fn cmd_build(args: &BuildArgs) -> Result<()> {
  let options = args.to_options();
  debug!(options = ?options, "resolved build options");

  let rt = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("Failed to create async runtime")?;

  let summary = match &args.out {
    Some(path) => package_to_file(&rt, &options, path)?,
    None => {
      let stdout = io::stdout();
      let mut sink = stdout.lock();
      let summary = rt.block_on(package(&options, &mut sink)).context("Build failed")?;
      sink.flush().context("Failed to flush stdout")?;
      summary
    }
  };

  report(&summary, args.out.as_deref());
  Ok(())
}

fn package_to_file(rt: &Runtime, options: &BuildOptions, path: &Path) -> Result<PackageSummary> {
  let dir = path
    .parent()
    .filter(|p| !p.as_os_str().is_empty())
    .unwrap_or(Path::new("."));

  let mut tmp =
    NamedTempFile::new_in(dir).with_context(|| format!("Failed to create output file in {}", dir.display()))?;
  let summary = rt.block_on(package(options, &mut tmp)).context("Build failed")?;
  tmp
    .persist(path)
    .with_context(|| format!("Failed to write {}", path.display()))?;

  Ok(summary)
}

fn report(summary: &PackageSummary, out: Option<&Path>) {
  if let Some(backup) = &summary.backup {
    print_status(Status::Info, &format!("Existing setup.py preserved as {}", backup.display()));
  }

  let target = out.map_or_else(|| "stdout".to_string(), |p| p.display().to_string());
  print_status(
    Status::Success,
    &format!(
      "Built {} ({}, settings {}) in {} → {}",
      summary.archive_name,
      format_size(summary.bytes),
      summary.settings.module,
      format_elapsed(summary.elapsed),
      target
    ),
  );
}
