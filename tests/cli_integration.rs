//! CLI integration tests for pomwright.
//!
//! These tests exercise the full workflow: manifest discovery, checking,
//! listing, trees, and generation from pom.xml files.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the pomwright binary command.
fn pomwright() -> Command {
    Command::cargo_bin("pomwright").unwrap()
}

/// Create a temporary directory for test workspaces.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

/// A minimal workspace root marker so discovery does not walk above the
/// temp directory.
fn mark_root(root: &Path) {
    write(root, "pomwright.toml", "");
}

// ============================================================================
// pomwright check
// ============================================================================

#[test]
fn test_check_clean_workspace() {
    let tmp = temp_dir();
    mark_root(tmp.path());
    write(
        tmp.path(),
        "service/http/BUILD",
        "python_library(\n  name = 'lib',\n  sources = ['server.py'],\n)\n",
    );
    write(
        tmp.path(),
        "service/web/BUILD",
        "python_library(name = 'lib', dependencies = ['service/http:lib'])\n",
    );

    pomwright()
        .arg("check")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("checked 2 files, 2 targets, 1 edges: ok"));
}

#[test]
fn test_check_from_module_dir_covers_whole_workspace() {
    let tmp = temp_dir();
    mark_root(tmp.path());
    // Module poms must not scope the workspace to the module.
    write(
        tmp.path(),
        "core/pom.xml",
        "<project><artifactId>core</artifactId></project>",
    );
    write(tmp.path(), "core/BUILD", "target(name = 'lib')\n");
    write(
        tmp.path(),
        "api/BUILD",
        "target(name = 'lib', dependencies = ['core:lib'])\n",
    );

    pomwright()
        .arg("check")
        .current_dir(tmp.path().join("core"))
        .assert()
        .success()
        .stdout(predicate::str::contains("checked 2 files, 2 targets, 1 edges: ok"));
}

#[test]
fn test_check_reports_dangling_edge() {
    let tmp = temp_dir();
    mark_root(tmp.path());
    write(
        tmp.path(),
        "app/BUILD",
        "target(name = 'app', dependencies = ['lib:missing'])\n",
    );

    pomwright()
        .args(["check", "--no-color"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("`lib:missing` does not resolve"))
        .stderr(predicate::str::contains("help: Run `pomwright targets"));
}

#[test]
fn test_check_reports_cycle() {
    let tmp = temp_dir();
    mark_root(tmp.path());
    write(tmp.path(), "a/BUILD", "target(name = 'a', dependencies = ['b:b'])\n");
    write(tmp.path(), "b/BUILD", "target(name = 'b', dependencies = ['a:a'])\n");

    pomwright()
        .arg("check")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("dependency cycle: a:a -> b:b"));
}

#[test]
fn test_check_reports_syntax_error() {
    let tmp = temp_dir();
    mark_root(tmp.path());
    write(tmp.path(), "broken/BUILD", "target(name = 'lib'\n");

    pomwright()
        .arg("check")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("syntax error"));
}

#[test]
fn test_check_json_output() {
    let tmp = temp_dir();
    mark_root(tmp.path());
    write(
        tmp.path(),
        "app/BUILD",
        "target(name = 'app', dependencies = [':app'])\n",
    );

    pomwright()
        .args(["check", "--json"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"kind\": \"cycle\""));
}

#[test]
fn test_check_outside_workspace_fails() {
    let tmp = temp_dir();

    pomwright()
        .arg("check")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not find"));
}

// ============================================================================
// pomwright targets
// ============================================================================

#[test]
fn test_targets_lists_sorted() {
    let tmp = temp_dir();
    mark_root(tmp.path());
    write(
        tmp.path(),
        "service/http/BUILD",
        "python_library(name = 'lib')\npython_tests(name = 'test', dependencies = [':lib'])\n",
    );
    write(
        tmp.path(),
        "tools/BUILD",
        "python_binary(name = 'cli', source = 'cli.py')\n",
    );

    pomwright()
        .arg("targets")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "service/http:lib (python_library)\n\
             service/http:test (python_tests)\n\
             tools:cli (python_binary)",
        ));
}

#[test]
fn test_targets_kind_filter() {
    let tmp = temp_dir();
    mark_root(tmp.path());
    write(
        tmp.path(),
        "service/http/BUILD",
        "python_library(name = 'lib')\npython_tests(name = 'test', dependencies = [':lib'])\n",
    );

    pomwright()
        .args(["targets", "--kind", "python_tests"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("service/http:test"))
        .stdout(predicate::str::contains("service/http:lib").not());
}

#[test]
fn test_targets_unknown_kind() {
    let tmp = temp_dir();
    mark_root(tmp.path());

    pomwright()
        .args(["targets", "--kind", "java_library"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown target kind"));
}

// ============================================================================
// pomwright tree
// ============================================================================

#[test]
fn test_tree_output() {
    let tmp = temp_dir();
    mark_root(tmp.path());
    write(
        tmp.path(),
        "app/BUILD",
        "target(name = 'app', dependencies = ['lib:lib', 'util:util'])\n",
    );
    write(
        tmp.path(),
        "lib/BUILD",
        "target(name = 'lib', dependencies = ['util:util'])\n",
    );
    write(tmp.path(), "util/BUILD", "target(name = 'util')\n");

    pomwright()
        .args(["tree", "app:app"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("├── lib:lib"))
        .stdout(predicate::str::contains("└── util:util (*)"));
}

#[test]
fn test_tree_unknown_target() {
    let tmp = temp_dir();
    mark_root(tmp.path());
    write(tmp.path(), "lib/BUILD", "target(name = 'lib')\n");

    pomwright()
        .args(["tree", "lib:nope"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not declared"));
}

// ============================================================================
// pomwright gen
// ============================================================================

fn seed_maven_workspace(root: &Path) {
    write(
        root,
        "pom.xml",
        r#"<project>
  <groupId>com.example</groupId>
  <artifactId>top</artifactId>
  <modules>
    <module>core</module>
    <module>api</module>
  </modules>
  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>com.google.guava</groupId>
        <artifactId>guava</artifactId>
        <version>18.0</version>
      </dependency>
    </dependencies>
  </dependencyManagement>
</project>
"#,
    );
    write(
        root,
        "core/pom.xml",
        "<project><groupId>com.example</groupId><artifactId>core</artifactId></project>",
    );
    write(root, "core/src/main/java/Core.java", "class Core {}");
    write(
        root,
        "api/pom.xml",
        r#"<project>
  <groupId>com.example</groupId>
  <artifactId>api</artifactId>
  <dependencies>
    <dependency>
      <groupId>com.example</groupId>
      <artifactId>core</artifactId>
    </dependency>
    <dependency>
      <groupId>com.google.guava</groupId>
      <artifactId>guava</artifactId>
    </dependency>
  </dependencies>
</project>
"#,
    );
}

#[test]
fn test_gen_writes_manifests() {
    let tmp = temp_dir();
    seed_maven_workspace(tmp.path());

    pomwright()
        .arg("gen")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 written, 0 unchanged, 0 skipped"));

    let manifest = fs::read_to_string(tmp.path().join("api/BUILD")).unwrap();
    assert!(manifest.starts_with("# Generated by pomwright"));
    assert!(manifest.contains("'core/src/main/java:lib'"));
    assert!(manifest.contains("'3rdparty:com.google.guava.guava'"));
}

#[test]
fn test_gen_second_run_is_unchanged() {
    let tmp = temp_dir();
    seed_maven_workspace(tmp.path());

    pomwright().arg("gen").current_dir(tmp.path()).assert().success();
    pomwright()
        .arg("gen")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0 written, 2 unchanged, 0 skipped"));
}

#[test]
fn test_gen_dry_run_writes_nothing() {
    let tmp = temp_dir();
    seed_maven_workspace(tmp.path());

    pomwright()
        .args(["gen", "--dry-run"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("would write"));

    assert!(!tmp.path().join("api/BUILD").exists());
}

#[test]
fn test_gen_without_top_pom_fails() {
    let tmp = temp_dir();
    mark_root(tmp.path());

    pomwright()
        .arg("gen")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no pom.xml"));
}

#[test]
fn test_gen_malformed_pom_fails() {
    let tmp = temp_dir();
    write(
        tmp.path(),
        "pom.xml",
        "<project><modules><module>core</module></modules></project>",
    );
    write(tmp.path(), "core/pom.xml", "<project><artifactId>core</artifactId");

    pomwright()
        .arg("gen")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed pom.xml"));
}

// ============================================================================
// pomwright completions
// ============================================================================

#[test]
fn test_completions_bash() {
    pomwright()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pomwright"));
}
