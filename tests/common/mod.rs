//! Shared helpers for driving the `rk` binary.

use assert_cmd::Command;
use std::path::Path;

pub use renderkit::test_utils::{TestProject, init_test_logging};

/// An `rk` command rooted at a project directory, without colors.
pub fn rk(project: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rk").unwrap();
    cmd.arg("-d").arg(project).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// Convert a path to a file:// URL string, properly handling Windows paths
pub fn path_to_file_url(path: &Path) -> String {
    let path_str = path.display().to_string().replace('\\', "/");
    if path_str.starts_with('/') {
        format!("file://{path_str}")
    } else {
        format!("file:///{path_str}")
    }
}
