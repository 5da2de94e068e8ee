//! Implementation of the `eggpack inspect` command.
//!
//! Shows what a build would use from a project descriptor without touching the
//! project or running the toolchain.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use eggpack_lib::consts::SETUP_PY;
use eggpack_lib::descriptor::{DescriptorSection, ResolvedSettings, read_descriptor, validate_descriptor_path};

use crate::output::{OutputFormat, print_json, print_stat};

#[derive(Debug, Serialize)]
struct InspectReport {
  descriptor: PathBuf,
  project_root: PathBuf,
  sections: Vec<DescriptorSection>,
  settings: ResolvedSettings,
  has_setup_py: bool,
}

/// Execute the inspect command.
///
/// # Errors
///
/// Returns an error if the descriptor path is rejected, the file cannot be
/// parsed, or it has no usable settings entry.
pub fn cmd_inspect(config: &Path, project: Option<&str>, format: OutputFormat) -> Result<()> {
  let path = validate_descriptor_path(config).context("Invalid project descriptor")?;
  let descriptor = read_descriptor(&path).context("Failed to read project descriptor")?;
  let settings = descriptor
    .resolve_settings(project)
    .context("Failed to resolve settings module")?;

  let project_root = descriptor.project_root().to_path_buf();
  let report = InspectReport {
    has_setup_py: project_root.join(SETUP_PY).is_file(),
    descriptor: descriptor.path.clone(),
    project_root,
    sections: descriptor.sections.clone(),
    settings,
  };

  if format.is_json() {
    return print_json(&report);
  }

  println!(
    "{}",
    "Project descriptor".if_supports_color(Stream::Stdout, |s| s.bold())
  );
  print_stat("Descriptor", &report.descriptor.display().to_string());
  print_stat("Project root", &report.project_root.display().to_string());
  let names: Vec<&str> = report.sections.iter().map(|s| s.name.as_str()).collect();
  print_stat("Sections", &names.join(", "));
  print_stat("Settings key", &report.settings.key);
  print_stat("Settings module", &report.settings.module);
  print_stat(
    "setup.py",
    if report.has_setup_py {
      "present (backed up before build)"
    } else {
      "absent (generated at build)"
    },
  );

  Ok(())
}
