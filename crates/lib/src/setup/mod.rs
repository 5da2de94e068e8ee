//! Synthesis of the `setup.py` build descriptor.
//!
//! setuptools needs a `setup.py` in the project root to build an egg. Scrapy
//! projects rarely ship one, so a minimal descriptor is written that registers
//! the project's settings module as the `scrapy` entry point.

mod backup;
mod templates;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::consts::SETUP_PY;

pub use backup::{BackupPolicy, backup_path, preserve_existing};
pub use templates::SETUP_PY_TEMPLATE;

/// Errors that can occur while preparing the build descriptor.
#[derive(Debug, Error)]
pub enum SetupError {
  #[error("failed to back up {} to {}: {source}", path.display(), backup.display())]
  Backup {
    path: PathBuf,
    backup: PathBuf,
    source: io::Error,
  },

  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },
}

/// Render `setup.py` for the given settings module.
pub fn render_setup_py(settings_module: &str) -> String {
  SETUP_PY_TEMPLATE.replace("{settings}", settings_module)
}

/// Write `setup.py` into `project_root`, replacing any existing file.
///
/// Callers that need the old file kept should run [`preserve_existing`] first.
///
/// # Errors
///
/// Returns [`SetupError::Write`] if the file cannot be written.
pub fn write_setup_py(project_root: &Path, settings_module: &str) -> Result<PathBuf, SetupError> {
  let path = project_root.join(SETUP_PY);

  fs::write(&path, render_setup_py(settings_module)).map_err(|source| SetupError::Write {
    path: path.clone(),
    source,
  })?;

  debug!(path = %path.display(), settings = settings_module, "wrote build descriptor");
  Ok(path)
}
