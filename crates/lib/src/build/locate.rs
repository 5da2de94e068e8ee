//! Locating the archive produced by the toolchain.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::BuildError;
use crate::consts::ARCHIVE_EXTENSION;

/// Find the single `.egg` file directly inside `workspace`.
///
/// # Errors
///
/// Returns [`BuildError::ArchiveNotFound`] if there is none and
/// [`BuildError::MultipleArchives`] if there is more than one.
pub fn locate_archive(workspace: &Path) -> Result<PathBuf, BuildError> {
  let mut found: Vec<PathBuf> = WalkDir::new(workspace)
    .min_depth(1)
    .max_depth(1)
    .into_iter()
    .filter_map(|e| e.ok())
    .filter(|e| e.file_type().is_file())
    .filter(|e| e.path().extension().and_then(|ext| ext.to_str()) == Some(ARCHIVE_EXTENSION))
    .map(|e| e.into_path())
    .collect();
  found.sort();

  match found.len() {
    0 => Err(BuildError::ArchiveNotFound {
      workspace: workspace.to_path_buf(),
    }),
    1 => Ok(found.remove(0)),
    _ => Err(BuildError::MultipleArchives {
      workspace: workspace.to_path_buf(),
      found,
    }),
  }
}
