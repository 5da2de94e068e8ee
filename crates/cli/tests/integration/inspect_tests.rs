//! Inspect command integration tests.

use predicates::prelude::*;

use super::common::{TestEnv, eggpack_cmd};

#[test]
fn inspect_text_report() {
  let env = TestEnv::from_fixture("scrapy.cfg");

  eggpack_cmd()
    .arg("inspect")
    .arg(&env.config_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("Settings module: proj.settings"))
    .stdout(predicate::str::contains("Sections: settings, deploy"))
    .stdout(predicate::str::contains("absent"));

  assert!(!env.exists("setup.py"), "inspect must not write setup.py");
}

#[test]
fn inspect_json_report() {
  let env = TestEnv::from_fixture("multi_project.cfg");
  env.write_file("setup.py", "# existing\n");

  let assert = eggpack_cmd()
    .arg("inspect")
    .arg(&env.config_path)
    .arg("--project")
    .arg("other")
    .arg("--format")
    .arg("json")
    .assert()
    .success();

  let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
  assert_eq!(report["settings"]["key"], "other");
  assert_eq!(report["settings"]["module"], "other_proj.settings");
  assert_eq!(report["has_setup_py"], true);
  assert_eq!(report["sections"][0]["name"], "settings");
  assert_eq!(report["sections"][1]["entries"]["project"], "proj");
  assert!(!env.exists("setup_backup.py"));
}

#[test]
fn inspect_missing_settings_fails() {
  let env = TestEnv::from_fixture("no_settings.cfg");

  eggpack_cmd()
    .arg("inspect")
    .arg(&env.config_path)
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("no section 'settings'"));
}

#[test]
fn inspect_rejects_non_cfg_path() {
  let env = TestEnv::from_fixture("scrapy.cfg");
  let other = env.project_dir.join("settings.ini");
  std::fs::write(&other, "[settings]\ndefault = proj.settings\n").unwrap();

  eggpack_cmd()
    .arg("inspect")
    .arg(&other)
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("not a .cfg file"));
}
