//! Plan command integration tests.

use predicates::prelude::*;
use serde_json::Value;

use super::common::TestEnv;

#[test]
fn plan_prints_summary_without_writing() {
  let env = TestEnv::from_fixture("engine_workspace.lua");

  env
    .solgen_cmd()
    .arg("plan")
    .arg(&env.config_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("Engine-Workspace"))
    .stdout(predicate::str::contains("win64-vs2019-Retail"))
    .stdout(predicate::str::contains("RenderTest → EngineGUI (private)"))
    .stdout(predicate::str::contains("Files: 3"));

  assert!(env.generated_files().is_empty());
}

#[test]
fn plan_json_lists_build_order() {
  let env = TestEnv::from_fixture("engine_workspace.lua");

  let output = env
    .solgen_cmd()
    .arg("plan")
    .arg(&env.config_path)
    .arg("-o")
    .arg("json")
    .output()
    .unwrap();
  assert!(output.status.success());

  let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
  let solution = &summary["solutions"][0];
  assert_eq!(solution["name"], "Engine-Workspace");
  assert_eq!(solution["configurations"].as_array().unwrap().len(), 3);

  let debug = &solution["configurations"][0];
  assert_eq!(debug["target"], "win64-vs2019-Debug");
  assert_eq!(debug["startup_project"], "RenderTest");
  assert_eq!(debug["build_order"][0], "EngineGUI");
  assert_eq!(debug["build_order"][1], "RenderTest");
}

#[test]
fn plan_hash_is_stable() {
  let env = TestEnv::from_fixture("engine_workspace.lua");

  let hash = || {
    let output = env
      .solgen_cmd()
      .arg("plan")
      .arg(&env.config_path)
      .arg("-o")
      .arg("json")
      .output()
      .unwrap();
    let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
    summary["hash"].as_str().unwrap().to_string()
  };

  assert_eq!(hash(), hash());
}

#[test]
fn plan_shows_the_cell_of_a_bound_dependency() {
  let env = TestEnv::from_fixture("cross_cell.lua");

  env
    .solgen_cmd()
    .arg("plan")
    .arg(&env.config_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("App → Lib@linux-make-Release (private)"))
    .stdout(predicate::str::contains("Build order: Lib, App"));
}
