//! The complete packaging pipeline.
//!
//! Builds the archive and emits it to a sink, returning an explicit result so
//! the caller can decide the exit status. Nothing is emitted once an error has
//! been detected.

use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::info;

use crate::build::{BuildError, BuildOptions, build_archive};
use crate::descriptor::ResolvedSettings;
use crate::emit::{EmitError, emit_artifact};

#[derive(Debug, Error)]
pub enum PackageError {
  #[error(transparent)]
  Build(#[from] BuildError),

  #[error(transparent)]
  Emit(#[from] EmitError),
}

/// Result of a successful packaging run.
#[derive(Debug, Clone)]
pub struct PackageSummary {
  pub archive_name: String,
  pub bytes: u64,
  pub settings: ResolvedSettings,
  /// Where an existing `setup.py` was copied, if anywhere
  pub backup: Option<PathBuf>,
  pub elapsed: Duration,
}

/// Build the project's egg and write it to `sink`.
///
/// # Errors
///
/// Returns [`PackageError::Build`] if the archive could not be produced and
/// [`PackageError::Emit`] if it could not be written out.
pub async fn package<W: Write>(options: &BuildOptions, sink: &mut W) -> Result<PackageSummary, PackageError> {
  let started = Instant::now();

  let artifact = build_archive(options).await?;
  let settings = artifact.settings.clone();
  let backup = artifact.backup.clone();

  let emitted = emit_artifact(artifact, sink)?;

  let summary = PackageSummary {
    archive_name: emitted.archive_name,
    bytes: emitted.bytes,
    settings,
    backup,
    elapsed: started.elapsed(),
  };
  info!(
    archive = %summary.archive_name,
    bytes = summary.bytes,
    elapsed_ms = summary.elapsed.as_millis() as u64,
    "packaged project"
  );
  Ok(summary)
}
