use assert_cmd::Command;
use predicates::prelude::*;

use crate::common::{TestProject, rk};

fn demo_project() -> TestProject {
    TestProject::new()
        .unwrap()
        .with_config("name: demo\n")
        .unwrap()
        .with_namespace("KOS-main", "- version: 1.0.0\n- author: me\n")
        .unwrap()
}

#[test]
fn test_help() {
    Command::cargo_bin("rk")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--template"))
        .stdout(predicate::str::contains("--scope"));
}

#[test]
fn test_stdin_template() {
    let project = demo_project();
    rk(project.path())
        .write_stdin("{{ name }} v{{ KOS.version }}\n")
        .assert()
        .success()
        .stdout("demo v1.0.0");
}

#[test]
fn test_template_file() {
    let project = demo_project().with_file("note.md", "by {{ KOS.author }}").unwrap();

    rk(project.path())
        .arg("-t")
        .arg(project.path().join("note.md"))
        .assert()
        .success()
        .stdout("by me");
}

#[test]
fn test_stdin_and_template_conflict() {
    let project = demo_project().with_file("note.md", "x").unwrap();

    rk(project.path())
        .arg("-t")
        .arg(project.path().join("note.md"))
        .write_stdin("{{ name }}")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Cannot read a template from stdin and --template"));
}

#[test]
fn test_scope_exposes_namespace() {
    let project = demo_project();
    rk(project.path())
        .args(["-s", "KOS"])
        .write_stdin("{{ name }}/{{ version }}/{{ author }}")
        .assert()
        .success()
        .stdout("demo/1.0.0/me");
}

#[test]
fn test_unknown_scope_is_a_warning() {
    let project = demo_project();
    rk(project.path())
        .args(["-s", "NOPE"])
        .write_stdin("{{ name }}")
        .assert()
        .success()
        .stdout("demo")
        .stderr(predicate::str::contains("Scope 'NOPE' not found"));
}

#[test]
fn test_set_overrides_and_adds() {
    let project = demo_project();
    rk(project.path())
        .args(["--set", "KOS.version=2.0.0", "--set", "extra.flag=on"])
        .write_stdin("{{ KOS.version }} {{ extra.flag }}")
        .assert()
        .success()
        .stdout("2.0.0 on");
}

#[test]
#[cfg(unix)]
fn test_set_value_can_be_a_directive() {
    let project = demo_project();
    rk(project.path())
        .args(["--set", "who=!echo cli"])
        .write_stdin("{{ who }}")
        .assert()
        .success()
        .stdout("cli");
}

#[test]
#[cfg(unix)]
fn test_rendered_output_directive_is_evaluated() {
    let project = demo_project();
    rk(project.path())
        .args(["--set", "word=hi"])
        .write_stdin("$!echo {{ word }}")
        .assert()
        .success()
        .stdout("hi");
}

#[test]
fn test_dollar_prefixed_output_is_literal() {
    let project = demo_project();
    rk(project.path())
        .args(["--set", "price=5.00"])
        .write_stdin("${{ price }} total")
        .assert()
        .success()
        .stdout("$5.00 total");
}

#[test]
fn test_render_error_exits_nonzero() {
    let project = demo_project();
    rk(project.path())
        .write_stdin("{{ name | no_such_filter }}")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to render template '<stdin>'"));
}

#[test]
fn test_directory_mode() {
    let project = demo_project()
        .with_template("top.txt", "{{ name }}")
        .unwrap()
        .with_template("KOS/readme.md", "{{ version }} by {{ author }}")
        .unwrap()
        .with_template("other/plain.txt", "[{{ version }}]")
        .unwrap();

    rk(project.path()).arg("--no-stdin").assert().success().stdout("");

    assert_eq!(project.read_output("top.txt").unwrap(), "demo");
    assert_eq!(project.read_output("KOS/readme.md").unwrap(), "1.0.0 by me");
    assert_eq!(project.read_output("other/plain.txt").unwrap(), "[]");
}

#[test]
fn test_directory_mode_continues_after_failure() {
    let project = demo_project()
        .with_template("a.txt", "{{ name | no_such_filter }}")
        .unwrap()
        .with_template("b.txt", "{{ name }}")
        .unwrap();

    rk(project.path())
        .arg("--no-stdin")
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed to render template a.txt"));

    assert!(!project.output_path("a.txt").exists());
    assert_eq!(project.read_output("b.txt").unwrap(), "demo");
}

#[test]
fn test_directory_mode_without_templates_fails() {
    let project = demo_project();
    rk(project.path())
        .arg("--no-stdin")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Template directory not found"));
}

#[test]
fn test_quiet_suppresses_warnings() {
    let project = demo_project();
    rk(project.path())
        .args(["-q", "-s", "NOPE"])
        .write_stdin("{{ name }}")
        .assert()
        .success()
        .stderr("");
}
