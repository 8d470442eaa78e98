use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

const MODELS: &str = "textpaths/lib/tests/fixtures/models.ts";

#[allow(deprecated)] // We need Command struct to set current_dir
fn tpaths_cmd() -> Command {
    let mut cmd = Command::cargo_bin("tpaths").unwrap();
    // Set working directory to repo root (2 levels up from cli/tests/)
    let repo_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf();
    cmd.current_dir(repo_root);
    cmd
}

#[test]
fn test_help_flag() {
    tpaths_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("textual fields"))
        .stdout(predicate::str::contains("--json"))
        .stdout(predicate::str::contains("--separator"));
}

#[test]
fn test_version_flag() {
    tpaths_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tpaths"));
}

#[test]
fn test_paths_plain_output() {
    tpaths_cmd()
        .args(["paths", MODELS, "--plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("models.ts (TypeScript)"))
        .stdout(predicate::str::contains("    User.name\n"))
        .stdout(predicate::str::contains("    User.address.geo.label\n"))
        .stdout(predicate::str::contains("    Settings.locale.language\n"))
        .stdout(predicate::str::contains("User.id").not())
        .stdout(predicate::str::contains("\x1b").not());
}

#[test]
fn test_separator_flag() {
    tpaths_cmd()
        .args(["--plain", "--separator", "/", "paths", MODELS])
        .assert()
        .success()
        .stdout(predicate::str::contains("User/address/street"));
}

#[test]
fn test_paths_json_output() {
    let output = tpaths_cmd()
        .args(["paths", MODELS, "--json"])
        .output()
        .expect("failed to run tpaths");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let declarations = &json["files"][0]["declarations"];

    assert_eq!(declarations[0]["name"], "User");
    assert_eq!(declarations[0]["category"], "declaration");
    assert_eq!(
        declarations[0]["paths"][3],
        serde_json::json!(["User", "address", "street"])
    );
    assert_eq!(declarations[1]["category"], "alias");
}

#[test]
fn test_json_flag_before_subcommand() {
    tpaths_cmd()
        .args(["--json", "paths", MODELS])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn test_language_filter_excludes_other_files() {
    tpaths_cmd()
        .args([
            "--language",
            "tsx",
            "--plain",
            "paths",
            "textpaths/lib/tests/fixtures/*",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("ButtonProps.label"))
        .stdout(predicate::str::contains("User.name").not());
}

#[test]
fn test_ignore_flag() {
    tpaths_cmd()
        .args([
            "--plain",
            "paths",
            "textpaths/lib/tests/fixtures/*.ts",
            "--ignore",
            "**/broken.ts",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Holder.value"))
        .stdout(predicate::str::contains("broken.ts").not());
}

#[test]
fn test_syntax_errors_are_reported() {
    tpaths_cmd()
        .args(["--plain", "paths", "textpaths/lib/tests/fixtures/broken.ts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  ! "));
}

#[test]
fn test_walk_annotates_matches() {
    tpaths_cmd()
        .args(["--plain", "walk", MODELS])
        .assert()
        .success()
        .stdout(predicate::str::contains("  program\n"))
        .stdout(predicate::str::contains("interface_declaration  [declaration #0]"))
        .stdout(predicate::str::contains("type_identifier \"User\""))
        .stdout(predicate::str::contains("type_alias_declaration  [alias #3]"));
}

#[test]
fn test_patterns_lists_scanners_in_order() {
    tpaths_cmd()
        .args(["--plain", "patterns"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "#0 declaration interface_declaration [type_identifier]",
        ))
        .stdout(predicate::str::contains(
            "#3 alias type_alias_declaration [type_identifier, object_type]",
        ));
}

#[test]
fn test_no_matching_files_fails() {
    tpaths_cmd()
        .args(["paths", "does/not/exist/*.ts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NoSourceFiles"));
}

#[test]
fn test_completions() {
    tpaths_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tpaths"));
}
