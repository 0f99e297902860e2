use predicates::prelude::*;
use serde_json::json;

use crate::common::{TestProject, rk};
use renderkit::config::{LoadOptions, load_document};

#[test]
fn test_override_files_layer_over_project() {
    let project = TestProject::new()
        .unwrap()
        .with_config("name: demo\nenv: dev\n")
        .unwrap()
        .with_namespace("KOS-main", "- version: 1.0.0\n- author: me\n")
        .unwrap()
        .with_file("prod.yaml", "env: prod\n")
        .unwrap()
        .with_file("KOS-release.yaml", "- version: 2.0.0\n")
        .unwrap();

    rk(project.path())
        .arg("-g")
        .arg(project.path().join("prod.yaml"))
        .arg("-c")
        .arg(project.path().join("KOS-release.yaml"))
        .write_stdin("{{ name }} {{ env }} {{ KOS.version }} {{ KOS.author }}")
        .assert()
        .success()
        .stdout("demo prod 2.0.0 me");
}

#[test]
fn test_no_project_config() {
    let project = TestProject::new().unwrap().with_config("name: demo\n").unwrap();

    rk(project.path())
        .arg("--no-project-config")
        .write_stdin("[{{ name }}]")
        .assert()
        .success()
        .stdout("[]");
}

#[test]
fn test_namespace_files_share_a_prefix() {
    let project = TestProject::new()
        .unwrap()
        .with_namespace("web-base", "- host: localhost\n")
        .unwrap()
        .with_namespace("web-ports", "- port: 8080\n")
        .unwrap();

    rk(project.path())
        .write_stdin("{{ web.host }}:{{ web.port }}")
        .assert()
        .success()
        .stdout("localhost:8080");
}

#[test]
fn test_invalid_yaml_is_fatal() {
    let project = TestProject::new().unwrap().with_config("key: [unclosed\n").unwrap();

    rk(project.path())
        .write_stdin("{{ key }}")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse configuration file"));
}

#[test]
fn test_wrong_shape_is_fatal() {
    let project = TestProject::new().unwrap().with_config("- just\n- a list\n").unwrap();

    rk(project.path())
        .write_stdin("x")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration document"));
}

#[test]
fn test_loaded_document_is_raw() {
    let project = TestProject::new()
        .unwrap()
        .with_config("cmd: \"$!echo hi\"\n")
        .unwrap();

    let loaded = load_document(&LoadOptions {
        project_root: project.path().to_path_buf(),
        set_vars: vec!["extra=@file.txt".to_string()],
        ..LoadOptions::default()
    })
    .unwrap();

    assert_eq!(loaded.document["cmd"], json!("$!echo hi"));
    assert_eq!(loaded.document["extra"], json!("@file.txt"));
    assert_eq!(loaded.document["repo_root"], json!(project.path().display().to_string()));
    assert_eq!(loaded.repo_root.as_deref(), Some(project.path()));
}
