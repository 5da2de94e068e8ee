//! Reading the project descriptor (`scrapy.cfg`).
//!
//! The descriptor is an INI file. Only the `settings` section matters for
//! packaging: it maps a project key (or `default`) to the dotted path of the
//! project's settings module, which becomes the egg's `scrapy` entry point.

mod path;

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::consts::{DEFAULT_SETTINGS_KEY, SETTINGS_SECTION};

pub use path::validate_descriptor_path;

/// Errors raised while locating or reading the descriptor.
///
/// All of these are configuration errors: none is retried.
#[derive(Debug, Error)]
pub enum DescriptorError {
  #[error("descriptor path is empty")]
  EmptyPath,

  #[error("descriptor path {} {reason}", path.display())]
  UnsafePath { path: PathBuf, reason: String },

  #[error("descriptor {} is not a .cfg file", path.display())]
  NotCfg { path: PathBuf },

  #[error("descriptor not found: {}: {source}", path.display())]
  NotFound { path: PathBuf, source: io::Error },

  #[error("failed to read descriptor {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: ini::Error,
  },

  #[error("no section 'settings' found in {}", path.display())]
  MissingSettings { path: PathBuf },

  #[error("invalid settings module {module:?} under key '{key}'")]
  InvalidSettingsModule { key: String, module: String },
}

/// One `[section]` of the descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptorSection {
  pub name: String,
  pub entries: BTreeMap<String, String>,
}

/// A parsed `scrapy.cfg`.
///
/// Construction guarantees the `settings` section is present.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDescriptor {
  /// Path the descriptor was read from
  pub path: PathBuf,
  /// Sections in file order; repeated headers are merged into the first one
  pub sections: Vec<DescriptorSection>,
}

/// The settings module chosen for the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSettings {
  /// Key under `[settings]` the module was taken from
  pub key: String,
  /// Dotted module path, e.g. `proj.settings`
  pub module: String,
}

impl ProjectDescriptor {
  /// Names of all sections, in file order.
  pub fn section_names(&self) -> Vec<&str> {
    self.sections.iter().map(|s| s.name.as_str()).collect()
  }

  pub fn section(&self, name: &str) -> Option<&DescriptorSection> {
    self.sections.iter().find(|s| s.name == name)
  }

  /// Directory containing the descriptor.
  pub fn project_root(&self) -> &Path {
    self.path.parent().unwrap_or(Path::new("."))
  }

  /// Resolve the settings module for `project`.
  ///
  /// Looks up the project key first, then `default`, ignoring case. When
  /// neither key is present the literal `default` is used as the module.
  ///
  /// # Errors
  ///
  /// Returns [`DescriptorError::InvalidSettingsModule`] if the value is not a
  /// dotted Python identifier.
  pub fn resolve_settings(&self, project: Option<&str>) -> Result<ResolvedSettings, DescriptorError> {
    let entries = self
      .section(SETTINGS_SECTION)
      .map(|s| &s.entries)
      .ok_or_else(|| DescriptorError::MissingSettings {
        path: self.path.clone(),
      })?;

    // Keys are stored lowercased
    let project_key = project.filter(|p| !p.is_empty()).map(str::to_lowercase);
    let found = project_key
      .as_deref()
      .into_iter()
      .chain(std::iter::once(DEFAULT_SETTINGS_KEY))
      .find_map(|key| entries.get(key).map(|module| (key, module.trim())));

    let resolved = match found {
      Some((key, module)) => ResolvedSettings {
        key: key.to_string(),
        module: module.to_string(),
      },
      None => {
        warn!(
          path = %self.path.display(),
          project = ?project,
          "no settings entry for project, using 'default'"
        );
        ResolvedSettings {
          key: DEFAULT_SETTINGS_KEY.to_string(),
          module: DEFAULT_SETTINGS_KEY.to_string(),
        }
      }
    };

    if !is_module_path(&resolved.module) {
      return Err(DescriptorError::InvalidSettingsModule {
        key: resolved.key,
        module: resolved.module,
      });
    }

    Ok(resolved)
  }
}

/// Parse the descriptor at `path`.
///
/// # Errors
///
/// Returns [`DescriptorError::Read`] if the file cannot be read or parsed, and
/// [`DescriptorError::MissingSettings`] if it has no `settings` section.
pub fn read_descriptor(path: &Path) -> Result<ProjectDescriptor, DescriptorError> {
  let ini = Ini::load_from_file_opt(path, parse_option()).map_err(|source| DescriptorError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  let mut sections: Vec<DescriptorSection> = Vec::new();
  for (name, props) in ini.iter() {
    // Keys above the first header have no section name
    let Some(name) = name else {
      continue;
    };

    let idx = match sections.iter().position(|s| s.name == name) {
      Some(idx) => idx,
      None => {
        sections.push(DescriptorSection {
          name: name.to_string(),
          entries: BTreeMap::new(),
        });
        sections.len() - 1
      }
    };

    for (key, value) in props.iter() {
      sections[idx].entries.insert(key.to_lowercase(), value.to_string());
    }
  }

  let descriptor = ProjectDescriptor {
    path: path.to_path_buf(),
    sections,
  };

  debug!(
    path = %path.display(),
    sections = ?descriptor.section_names(),
    "read project descriptor"
  );

  if descriptor.section(SETTINGS_SECTION).is_none() {
    return Err(DescriptorError::MissingSettings {
      path: path.to_path_buf(),
    });
  }

  Ok(descriptor)
}

// Backslashes and quotes are kept verbatim and indented lines continue the
// previous value, as in Python's configparser
fn parse_option() -> ParseOption {
  ParseOption {
    enabled_quote: false,
    enabled_escape: false,
    enabled_indented_mutiline_value: true,
    ..ParseOption::default()
  }
}

fn is_module_path(module: &str) -> bool {
  !module.is_empty()
    && module.split('.').all(|part| {
      let mut chars = part.chars();
      matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}
