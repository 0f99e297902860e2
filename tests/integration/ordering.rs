use predicates::prelude::*;

use crate::common::{TestProject, rk};

#[test]
#[cfg(unix)]
fn test_chain_resolves_in_dependency_order() {
    let project = TestProject::new()
        .unwrap()
        .with_config(
            "c: \"$!echo {{ b }}\"\n\
             b: \"${{ a }}/sub\"\n\
             a: static\n",
        )
        .unwrap();

    rk(project.path()).write_stdin("{{ c }}").assert().success().stdout("static/sub");
}

#[test]
fn test_namespace_sibling_references() {
    let project = TestProject::new()
        .unwrap()
        .with_config("version: global\n")
        .unwrap()
        .with_namespace("KOS-main", "- version: 1.0.0\n- tag: \"$v{{ version }}\"\n")
        .unwrap();

    rk(project.path()).write_stdin("{{ KOS.tag }}").assert().success().stdout("v1.0.0");
}

#[test]
fn test_cycle_fails_without_output() {
    let project = TestProject::new()
        .unwrap()
        .with_config("a: \"${{ b }}\"\nb: \"${{ a }}\"\n")
        .unwrap();

    rk(project.path())
        .write_stdin("{{ a }}")
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Circular dependency detected: a -> b -> a"));
}

#[test]
fn test_cycle_outside_template_needs_is_ignored() {
    let project = TestProject::new()
        .unwrap()
        .with_config("a: \"${{ b }}\"\nb: \"${{ a }}\"\nc: fine\n")
        .unwrap();

    rk(project.path()).write_stdin("{{ c }}").assert().success().stdout("fine");
}

#[test]
fn test_output_is_deterministic() {
    let project = TestProject::new()
        .unwrap()
        .with_config("x: \"${{ y }}-x\"\ny: \"${{ z }}-y\"\nz: z\nw: \"${{ x }}{{ y }}\"\n")
        .unwrap();

    let first = rk(project.path()).write_stdin("{{ w }}").output().unwrap();
    let second = rk(project.path()).write_stdin("{{ w }}").output().unwrap();

    assert!(first.status.success());
    assert_eq!(String::from_utf8_lossy(&first.stdout), "z-y-xz-y");
    assert_eq!(first.stdout, second.stdout);
}
