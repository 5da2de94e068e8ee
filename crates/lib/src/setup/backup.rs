//! Preserving files before they are overwritten.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::SetupError;

/// How an existing file is kept before being replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackupPolicy {
  /// A single `<stem>_backup.<ext>`, replaced on every run.
  #[default]
  Single,
  /// `<stem>_backup.<n>.<ext>` with the first unused `n`, starting at 1.
  Numbered,
}

/// Derive the backup path for `path` under `policy`.
pub fn backup_path(path: &Path, policy: BackupPolicy) -> PathBuf {
  let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
  let ext = path.extension().map(|e| format!(".{}", e.to_string_lossy())).unwrap_or_default();
  let dir = path.parent().unwrap_or(Path::new(""));

  match policy {
    BackupPolicy::Single => dir.join(format!("{stem}_backup{ext}")),
    BackupPolicy::Numbered => (1u32..)
      .map(|n| dir.join(format!("{stem}_backup.{n}{ext}")))
      .find(|candidate| !candidate.exists())
      .unwrap_or_else(|| dir.join(format!("{stem}_backup{ext}"))),
  }
}

/// Copy an existing file to its backup name.
///
/// Returns the backup path, or `None` if `path` does not exist. The source file is
/// left in place.
///
/// # Errors
///
/// Returns [`SetupError::Backup`] if the copy fails.
pub fn preserve_existing(path: &Path, policy: BackupPolicy) -> Result<Option<PathBuf>, SetupError> {
  if !path.is_file() {
    return Ok(None);
  }

  let backup = backup_path(path, policy);
  if policy == BackupPolicy::Single && replaces_different_content(path, &backup) {
    warn!(
      backup = %backup.display(),
      "replacing previous backup with different content, use --backup numbered to keep every copy"
    );
  }

  fs::copy(path, &backup).map_err(|source| SetupError::Backup {
    path: path.to_path_buf(),
    backup: backup.clone(),
    source,
  })?;

  info!(
    path = %path.display(),
    backup = %backup.display(),
    "preserved existing file"
  );

  Ok(Some(backup))
}

fn replaces_different_content(path: &Path, backup: &Path) -> bool {
  match (fs::read(path), fs::read(backup)) {
    (Ok(current), Ok(previous)) => current != previous,
    _ => false,
  }
}
