//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Bytes written by [`egg_script`].
pub const EGG_BYTES: &[u8] = b"PK\x03\x04fake-egg-payload";

/// Fake toolchain that fails the way setuptools does without bdist_egg.
pub const FAILING_SCRIPT: &str = r#"
echo "error: invalid command 'bdist_egg'" >&2
exit 1
"#;

/// Fake toolchain writing one egg per name into the workspace (`$6`).
pub fn egg_script(names: &[&str]) -> String {
  let mut script = String::from(
    r#"
[ "$1" = "setup.py" ] || exit 64
[ -f setup.py ] || { echo "setup.py missing in $(pwd)" >&2; exit 65; }
"#,
  );
  for name in names {
    script.push_str(&format!("printf 'PK\\003\\004fake-egg-payload' > \"$6/{name}\"\n"));
  }
  script
}

/// Get a Command for the eggpack binary.
pub fn eggpack_cmd() -> Command {
  let mut cmd = cargo_bin_cmd!("eggpack");
  cmd
    .env_remove("SCRAPY_PROJECT")
    .env_remove("EGGPACK_PYTHON")
    .env_remove("EGGPACK_WORKSPACE_DIR")
    .env_remove("RUST_LOG");
  cmd
}

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Isolated test environment.
///
/// Each test gets a project directory holding `scrapy.cfg` and its own
/// directory for build workspaces.
pub struct TestEnv {
  pub temp: TempDir,
  pub project_dir: PathBuf,
  pub config_path: PathBuf,
  pub workspaces: PathBuf,
}

impl TestEnv {
  /// Create from a fixture file, copied to `<temp>/proj/scrapy.cfg`.
  pub fn from_fixture(name: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let project_dir = temp.path().join("proj");
    let workspaces = temp.path().join("workspaces");
    std::fs::create_dir_all(&project_dir).unwrap();
    std::fs::create_dir_all(&workspaces).unwrap();

    let config_path = project_dir.join("scrapy.cfg");
    std::fs::write(&config_path, fixture_content(name)).unwrap();

    Self {
      project_dir: dunce::canonicalize(&project_dir).unwrap(),
      config_path: dunce::canonicalize(&config_path).unwrap(),
      workspaces: dunce::canonicalize(&workspaces).unwrap(),
      temp,
    }
  }

  /// Write a file relative to the project directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    std::fs::write(self.project_dir.join(relative_path), content).unwrap();
  }

  pub fn read_file(&self, relative_path: &str) -> String {
    std::fs::read_to_string(self.project_dir.join(relative_path)).unwrap()
  }

  pub fn exists(&self, relative_path: &str) -> bool {
    self.project_dir.join(relative_path).exists()
  }

  /// `eggpack build` for this project, with `script` standing in for Python.
  pub fn build_cmd(&self, script: &str) -> Command {
    let script_path = self.temp.path().join("fake-python.sh");
    std::fs::write(&script_path, script).unwrap();

    let mut cmd = eggpack_cmd();
    cmd
      .arg("build")
      .arg(&self.config_path)
      .arg("--python")
      .arg("/bin/sh")
      .arg("--python-arg")
      .arg(&script_path)
      .arg("--workspace-dir")
      .arg(&self.workspaces);
    cmd
  }

  /// Entries left behind in the workspace directory.
  pub fn leftover_workspaces(&self) -> Vec<PathBuf> {
    list_dir(&self.workspaces)
  }
}

fn list_dir(dir: &Path) -> Vec<PathBuf> {
  std::fs::read_dir(dir).unwrap().map(|e| e.unwrap().path()).collect()
}
