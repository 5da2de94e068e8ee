//! Test utilities for eggpack-lib.
//!
//! The build toolchain is simulated by `/bin/sh` running a small script that
//! receives the same arguments setuptools would:
//! `setup.py clean -a bdist_egg -d <workspace>`, so `$6` is the workspace.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::build::{BuildOptions, Toolchain};

/// Bytes written by [`egg_script`] for its default content.
pub const EGG_BYTES: &[u8] = b"PK\x03\x04fake-egg-payload";

/// `printf` format producing [`EGG_BYTES`].
const EGG_PRINTF: &str = r"PK\003\004fake-egg-payload";

/// Script that exits non-zero with a setuptools-like error.
pub const FAILING_SCRIPT: &str = r#"
echo "error: invalid command 'bdist_egg'" >&2
exit 1
"#;

/// Script that writes one egg per name into the workspace.
///
/// Fails unless it is run from a directory containing `setup.py`.
pub fn egg_script(names: &[&str]) -> String {
  let mut script = String::from(
    r#"
[ "$1" = "setup.py" ] || exit 64
[ -f setup.py ] || { echo "setup.py missing in $(pwd)" >&2; exit 65; }
"#,
  );
  for name in names {
    script.push_str(&format!("printf '{EGG_PRINTF}' > \"$6/{name}\"\n"));
  }
  script
}

/// A throwaway project: `<temp>/proj/scrapy.cfg` plus sibling directories for
/// tool scripts and build workspaces.
pub struct FakeProject {
  pub temp: TempDir,
  pub root: PathBuf,
  pub cfg: PathBuf,
  pub workspaces: PathBuf,
}

impl FakeProject {
  pub fn new(cfg_content: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("proj");
    let workspaces = temp.path().join("workspaces");
    fs::create_dir_all(&root).unwrap();
    fs::create_dir_all(&workspaces).unwrap();

    let cfg = root.join("scrapy.cfg");
    fs::write(&cfg, cfg_content).unwrap();

    Self {
      root: dunce::canonicalize(&root).unwrap(),
      cfg: dunce::canonicalize(&cfg).unwrap(),
      workspaces: dunce::canonicalize(&workspaces).unwrap(),
      temp,
    }
  }

  /// A toolchain running `script` with `/bin/sh`.
  pub fn toolchain(&self, script: &str) -> Toolchain {
    let path = self.temp.path().join("fake-python.sh");
    fs::write(&path, script).unwrap();
    Toolchain::new("/bin/sh").with_args([path])
  }

  pub fn options(&self, script: &str) -> BuildOptions {
    BuildOptions {
      toolchain: self.toolchain(script),
      workspace_root: Some(self.workspaces.clone()),
      ..BuildOptions::new(&self.cfg)
    }
  }

  pub fn write_file(&self, relative_path: &str, content: &str) {
    fs::write(self.root.join(relative_path), content).unwrap();
  }

  pub fn read_file(&self, relative_path: &str) -> String {
    fs::read_to_string(self.root.join(relative_path)).unwrap()
  }

  /// Entries left in the workspace parent directory.
  pub fn leftover_workspaces(&self) -> Vec<PathBuf> {
    list_dir(&self.workspaces)
  }
}

pub fn list_dir(dir: &Path) -> Vec<PathBuf> {
  fs::read_dir(dir).unwrap().map(|e| e.unwrap().path()).collect()
}
