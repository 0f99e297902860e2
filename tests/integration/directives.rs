use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

use crate::common::{TestProject, init_test_logging, path_to_file_url, rk};

#[test]
fn test_repo_file_defaults_to_project_root() {
    init_test_logging(None);
    let project = TestProject::new()
        .unwrap()
        .with_config("data: \"@data.txt\"\n")
        .unwrap()
        .with_file("data.txt", "from project")
        .unwrap();

    rk(project.path()).write_stdin("{{ data }}").assert().success().stdout("from project");
}

#[test]
fn test_repo_root_override() {
    let repo = TempDir::new().unwrap();
    fs::write(repo.path().join("data.txt"), "from repo").unwrap();
    let project = TestProject::new().unwrap().with_config("data: \"@/data.txt\"\n").unwrap();

    rk(project.path())
        .arg("-r")
        .arg(repo.path())
        .write_stdin("{{ data }}")
        .assert()
        .success()
        .stdout("from repo");
}

#[test]
fn test_invalid_repo_root_gives_placeholder() {
    let project = TestProject::new()
        .unwrap()
        .with_config("repo_root: /definitely/not/a/dir\ndata: \"@data.txt\"\n")
        .unwrap();

    rk(project.path())
        .write_stdin("{{ data }}")
        .assert()
        .success()
        .stdout("<render error: repo_root undefined>")
        .stderr(predicate::str::contains("not a valid directory"));
}

#[test]
fn test_missing_repo_file_gives_placeholder() {
    let project = TestProject::new().unwrap().with_config("data: \"@nope.txt\"\n").unwrap();

    rk(project.path())
        .write_stdin("[{{ data }}]")
        .assert()
        .success()
        .stdout("[<render error: file not found>]");
}

#[test]
fn test_file_uri() {
    let external = TempDir::new().unwrap();
    let file = external.path().join("notes.txt");
    fs::write(&file, "absolute content").unwrap();

    let project = TestProject::new()
        .unwrap()
        .with_config(&format!("notes: \"{}\"\n", path_to_file_url(&file)))
        .unwrap();

    rk(project.path()).write_stdin("{{ notes }}").assert().success().stdout("absolute content");
}

#[test]
fn test_rendered_file_path() {
    let project = TestProject::new()
        .unwrap()
        .with_config("name: chapter\nbody: \"$@docs/{{ name }}.md\"\n")
        .unwrap()
        .with_file("docs/chapter.md", "# Chapter")
        .unwrap();

    rk(project.path()).write_stdin("{{ body }}").assert().success().stdout("# Chapter");
}

#[test]
#[cfg(unix)]
fn test_command_runs_in_repo_root() {
    let project = TestProject::new()
        .unwrap()
        .with_config("listing: \"!ls marker\"\n")
        .unwrap()
        .with_file("marker", "")
        .unwrap();

    rk(project.path()).write_stdin("{{ listing }}").assert().success().stdout("marker");
}

#[test]
#[cfg(unix)]
fn test_failing_command_gives_placeholder() {
    let project = TestProject::new().unwrap().with_config("broken: \"!exit 7\"\n").unwrap();

    rk(project.path())
        .write_stdin("{{ broken }}")
        .assert()
        .success()
        .stdout("<render error: command failed>");
}

#[test]
#[cfg(unix)]
fn test_unrendered_template_is_never_executed() {
    let project = TestProject::new()
        .unwrap()
        .with_config("name: pwned\ncmd: \"!touch {{ name }}\"\n")
        .unwrap();

    rk(project.path()).write_stdin("{{ cmd }}").assert().success().stdout("!touch {{ name }}");

    assert!(!project.path().join("pwned").exists());
}
