//! CLI integration tests using the real cmdweave binary

mod common;

use common::TestWorkspace;
use predicates::prelude::*;

const DEPLOY_TREE: &str = "cmds:
  - name: deploy
    description: Deploy the service
  - name: deploy staging
    flags:
      - name: token
        required: true
";

#[test]
fn test_help_output() {
    let ws = TestWorkspace::new();
    ws.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_version_output() {
    let ws = TestWorkspace::new();
    ws.cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cmdweave"))
        .stdout(predicate::str::contains("Build info"));
}

#[test]
fn test_list_without_manifests() {
    let ws = TestWorkspace::new();
    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No commands found."));
}

#[test]
fn test_list_current_directory_commands() {
    let ws = TestWorkspace::new();
    ws.write_manifest(DEPLOY_TREE);

    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Available commands (2):"))
        .stdout(predicate::str::contains("cmdfile (current directory)"))
        .stdout(predicate::str::contains("deploy staging"))
        .stdout(predicate::str::contains("Deploy the service"));
}

#[test]
fn test_list_with_prefix() {
    let ws = TestWorkspace::new();
    ws.write_manifest("cmds:\n  - name: build\n  - name: deploy\n  - name: deploy staging\n");

    ws.cmd()
        .args(["list", "deploy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Available commands (2):"))
        .stdout(predicate::str::contains("build").not());
}

#[test]
fn test_list_marks_ambiguous_names() {
    let ws = TestWorkspace::new();
    ws.write_manifest("cmds:\n  - name: build\n");
    ws.create_local_module("tools", "cmds:\n  - name: build\n");

    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("tools (module)"))
        .stdout(predicate::str::contains("tools build"))
        .stdout(predicate::str::contains("(ambiguous)"));
}

#[test]
fn test_list_includes_user_and_vendored_modules() {
    let ws = TestWorkspace::new();
    let app = ws.create_local_module("app", "cmds:\n  - name: run\n");
    TestWorkspace::create_vendored_module(&app, "helper", "cmds:\n  - name: greet\n");
    ws.create_user_module("personal", "cmds:\n  - name: notes\n");

    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("app run"))
        .stdout(predicate::str::contains("helper greet"))
        .stdout(predicate::str::contains("personal notes"));
}

#[test]
fn test_list_json() {
    let ws = TestWorkspace::new();
    ws.write_manifest("cmds:\n  - name: build\n");
    ws.create_local_module("tools", "cmds:\n  - name: build\n  - name: lint\n");

    let output = ws
        .cmd()
        .args(["list", "--json"])
        .output()
        .expect("run cmdweave");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["sources"], serde_json::json!(["cmdfile", "tools"]));
    assert_eq!(json["ambiguous"], serde_json::json!(["build"]));

    let names: Vec<&str> = json["commands"]
        .as_array()
        .expect("commands array")
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(names, vec!["build", "tools build", "tools lint"]);
}

#[test]
fn test_list_reports_broken_module_as_warning() {
    let ws = TestWorkspace::new();
    ws.write_manifest("cmds:\n  - name: build\n");
    ws.create_local_module("broken", "cmds: [unclosed");

    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stderr(predicate::str::contains("warning:"))
        .stderr(predicate::str::contains("manifest_parse_skipped"));
}

#[test]
fn test_list_with_directory_flag() {
    let ws = TestWorkspace::new();
    ws.write_manifest("cmds:\n  - name: build\n");

    ws.cmd()
        .current_dir(ws.temp.path())
        .args(["-C", "project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("build"));
}

#[test]
fn test_show_subcommand() {
    let ws = TestWorkspace::new();
    ws.write_manifest(DEPLOY_TREE);

    ws.cmd()
        .args(["show", "deploy", "staging"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy staging"))
        .stdout(predicate::str::contains("--token (required)"));
}

#[test]
fn test_show_missing_command_fails() {
    let ws = TestWorkspace::new();
    ws.write_manifest("cmds:\n  - name: build\n");

    ws.cmd()
        .args(["show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("command 'nope' not found"));
}

#[test]
fn test_validate_success() {
    let ws = TestWorkspace::new();
    ws.write_manifest(
        "cmds:
  - name: build
  - name: test
    depends_on:
      cmds:
        - alternatives: [build]
          execute: true
",
    );

    ws.cmd()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Valid:"));
}

#[test]
fn test_validate_cycle_fails() {
    let ws = TestWorkspace::new();
    ws.write_manifest(
        "cmds:
  - name: a
    depends_on:
      cmds:
        - alternatives: [b]
          execute: true
  - name: b
    depends_on:
      cmds:
        - alternatives: [a]
          execute: true
",
    );

    ws.cmd()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Circular execution dependency"));
}

#[test]
fn test_validate_args_with_subcommands_fails() {
    let ws = TestWorkspace::new();
    ws.write_manifest(
        "cmds:\n  - name: deploy\n    args:\n      - name: env\n  - name: deploy staging\n",
    );

    ws.cmd()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("has both args and subcommands"));
}

#[test]
fn test_validate_dependency_with_required_input_fails() {
    let ws = TestWorkspace::new();
    ws.write_manifest(
        "cmds:
  - name: build
    args:
      - name: target
        required: true
  - name: test
    depends_on:
      cmds:
        - alternatives: [build]
          execute: true
",
    );

    ws.cmd()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires input"))
        .stderr(predicate::str::contains("argument 'target'"));
}

#[test]
fn test_validate_module_collision_and_alias() {
    let ws = TestWorkspace::new();
    ws.create_local_module("tools", "cmds:\n  - name: lint\n");
    let extra = ws.temp.path().join("extra");
    let included = TestWorkspace::create_module(&extra, "tools", "cmds:\n  - name: fmt\n");

    ws.write_config(&format!("includes:\n  - path: {}\n", included.display()));
    ws.cmd()
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("module 'tools' is defined by both"));

    ws.write_config(&format!(
        "includes:\n  - path: {}\n    alias: extra.tools\n",
        included.display()
    ));
    ws.cmd().arg("validate").assert().success();
}

#[test]
fn test_invalid_config_fails() {
    let ws = TestWorkspace::new();
    ws.write_config("includes: [");

    ws.cmd()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse configuration file"));
}

#[test]
fn test_completions() {
    let ws = TestWorkspace::new();
    ws.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cmdweave"));

    ws.cmd()
        .args(["completions", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown shell: tcsh"));
}
