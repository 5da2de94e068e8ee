//! Emitting the built archive.
//!
//! The archive is read whole and handed to the sink in one write, then the
//! archive and its workspace are deleted. Output is write-once: a failed write
//! is reported, never resumed.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::build::{BuildWorkspace, BuiltArtifact};

#[derive(Debug, Error)]
pub enum EmitError {
  #[error("failed to read archive {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to write archive {} to output: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },
}

/// What was written to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitSummary {
  /// File name of the emitted archive
  pub archive_name: String,
  pub bytes: u64,
}

/// Write the archive to `sink` and remove it together with its workspace.
///
/// Cleanup runs whether or not emission succeeded. Cleanup failures are
/// logged and do not turn a successful emission into an error.
///
/// # Errors
///
/// Returns [`EmitError::Read`] if the archive cannot be read and
/// [`EmitError::Write`] if the sink rejects the data.
pub fn emit_artifact<W: Write>(artifact: BuiltArtifact, sink: &mut W) -> Result<EmitSummary, EmitError> {
  let BuiltArtifact { archive, workspace, .. } = artifact;

  let result = write_archive(&archive, sink);
  cleanup(&archive, workspace);
  result
}

fn write_archive<W: Write>(archive: &Path, sink: &mut W) -> Result<EmitSummary, EmitError> {
  let bytes = fs::read(archive).map_err(|source| EmitError::Read {
    path: archive.to_path_buf(),
    source,
  })?;

  sink
    .write_all(&bytes)
    .and_then(|()| sink.flush())
    .map_err(|source| EmitError::Write {
      path: archive.to_path_buf(),
      source,
    })?;

  let summary = EmitSummary {
    archive_name: archive
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_default(),
    bytes: bytes.len() as u64,
  };
  info!(archive = %summary.archive_name, bytes = summary.bytes, "emitted archive");
  Ok(summary)
}

fn cleanup(archive: &Path, workspace: BuildWorkspace) {
  if let Err(e) = fs::remove_file(archive)
    && e.kind() != io::ErrorKind::NotFound
  {
    warn!(path = %archive.display(), error = %e, "failed to remove archive");
  }

  let dir = workspace.path().to_path_buf();
  match workspace.remove() {
    Ok(()) => debug!(path = %dir.display(), "removed build workspace"),
    Err(e) => warn!(path = %dir.display(), error = %e, "failed to remove build workspace"),
  }
}
