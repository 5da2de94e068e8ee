//! Validation of user-supplied descriptor paths.
//!
//! The path ends up as a subprocess working directory, so anything that looks
//! like traversal or shell syntax is refused before it reaches the toolchain.

use std::path::{Component, Path, PathBuf};

use super::DescriptorError;

const FORBIDDEN_CHARS: &[char] = &[
  ';', '&', '|', '>', '<', '`', '$', '(', ')', '{', '}', '[', ']', '!', '#',
];

/// Validate a descriptor path and return its canonical form.
///
/// # Errors
///
/// Returns an error if the path:
/// - is empty or starts with a UNC prefix
/// - contains a `..` component, a shell metacharacter or non-ASCII text
/// - does not end in `.cfg`
/// - does not exist
pub fn validate_descriptor_path(path: &Path) -> Result<PathBuf, DescriptorError> {
  let Some(text) = path.to_str() else {
    return Err(unsafe_path(path, "is not valid UTF-8"));
  };

  if text.is_empty() {
    return Err(DescriptorError::EmptyPath);
  }
  if text.starts_with(r"\\") {
    return Err(unsafe_path(path, "is a UNC path"));
  }
  if path.components().any(|c| matches!(c, Component::ParentDir)) {
    return Err(unsafe_path(path, "contains a '..' component"));
  }
  if let Some(c) = text.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
    return Err(DescriptorError::UnsafePath {
      path: path.to_path_buf(),
      reason: format!("contains forbidden character '{c}'"),
    });
  }
  if !text.is_ascii() {
    return Err(unsafe_path(path, "contains non-ASCII characters"));
  }
  if path.extension().and_then(|e| e.to_str()) != Some("cfg") {
    return Err(DescriptorError::NotCfg {
      path: path.to_path_buf(),
    });
  }

  dunce::canonicalize(path).map_err(|source| DescriptorError::NotFound {
    path: path.to_path_buf(),
    source,
  })
}

fn unsafe_path(path: &Path, reason: &str) -> DescriptorError {
  DescriptorError::UnsafePath {
    path: path.to_path_buf(),
    reason: reason.to_string(),
  }
}
