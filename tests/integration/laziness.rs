use predicates::prelude::*;
use serde_json::json;

use crate::common::{TestProject, rk};
use renderkit::Pipeline;

fn ns_project() -> TestProject {
    TestProject::new()
        .unwrap()
        .with_namespace("NS", "- light: Safe\n- heavy: \"$!touch sentinel\"\n")
        .unwrap()
}

#[test]
#[cfg(unix)]
fn test_leaf_access_skips_sibling_command() {
    let project = ns_project();

    rk(project.path()).write_stdin("{{ NS.light }}").assert().success().stdout("Safe");

    assert!(!project.path().join("sentinel").exists(), "heavy must not run");
}

#[test]
#[cfg(unix)]
fn test_whole_namespace_access_runs_everything() {
    let project = ns_project();

    rk(project.path()).write_stdin("{% for key in NS %}{{ key }};{% endfor %}{{ NS }}").assert().success();

    assert!(project.path().join("sentinel").exists(), "heavy must run");
}

#[test]
#[cfg(unix)]
fn test_directory_mode_only_runs_what_templates_use() {
    let project = ns_project()
        .with_template("a.txt", "{{ NS.light }}")
        .unwrap()
        .with_template("b.txt", "static")
        .unwrap();

    rk(project.path()).arg("--no-stdin").assert().success();

    assert_eq!(project.read_output("a.txt").unwrap(), "Safe");
    assert_eq!(project.read_output("b.txt").unwrap(), "static");
    assert!(!project.path().join("sentinel").exists());
}

#[test]
#[cfg(unix)]
fn test_unrelated_global_command_never_runs() {
    let project = TestProject::new()
        .unwrap()
        .with_config("used: value\nother: \"$!touch sentinel\"\n")
        .unwrap();

    rk(project.path())
        .write_stdin("{{ used }} done")
        .assert()
        .success()
        .stdout(predicate::str::ends_with("done"));

    assert!(!project.path().join("sentinel").exists());
}

#[test]
#[cfg(unix)]
fn test_static_template_runs_no_commands() {
    let project = TestProject::new()
        .unwrap()
        .with_config("other: \"$!touch sentinel\"\n")
        .unwrap();

    rk(project.path()).write_stdin("hello").assert().success().stdout("hello");

    assert!(!project.path().join("sentinel").exists());
}

#[test]
#[cfg(unix)]
fn test_broken_template_runs_no_commands() {
    let project = ns_project();

    rk(project.path()).write_stdin("{{ NS.light ").assert().failure().code(1);

    assert!(!project.path().join("sentinel").exists());
}

#[test]
fn test_unreferenced_failures_do_not_surface() {
    let document = json!({
        "used": "value",
        "broken": "${{ x | no_such_filter }}",
        "missing": "@nowhere.txt"
    });
    let document = document.as_object().cloned().unwrap();

    let resolved = Pipeline::new().resolve(&document, &["{{ used }}"], None).unwrap();

    assert_eq!(resolved["used"], json!("value"));
    assert_eq!(resolved["broken"], json!("${{ x | no_such_filter }}"));
    assert_eq!(resolved["missing"], json!("@nowhere.txt"));
}
