//! Directive evaluation for resolved string values.
//!
//! After a value has been rendered it may still be a *directive*:
//!
//! | Form | Result |
//! |------|--------|
//! | `file://<uri>` | Contents of the file, relative paths against the working directory |
//! | `@<path>` | Contents of `<repo_root>/<path>` |
//! | `!<command>` | Trimmed stdout of the command, run in `repo_root` when valid |
//! | anything else | The string itself |
//!
//! Failures never propagate: they are logged and the value becomes one of the
//! `<render error: ...>` placeholders from [`crate::constants`].
//!
//! A value that still contains template delimiters is returned untouched.
//! Rendered text from a referenced value can therefore never be promoted to a
//! file read or command unless its own template produced a complete directive.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::constants::{
    COMMAND_PREFIX, FILE_URI_PREFIX, PLACEHOLDER_COMMAND_FAILED, PLACEHOLDER_FILE_NOT_FOUND,
    PLACEHOLDER_INVALID_URI, PLACEHOLDER_READ_FAILED, PLACEHOLDER_REPO_ROOT_UNDEFINED,
    REPO_FILE_PREFIX, TEMPLATE_DELIMITERS,
};
use crate::utils::platform::{get_shell_command, is_windows};

/// Evaluates `file://`, `@` and `!` directives.
#[derive(Debug, Clone, Default)]
pub struct DirectiveEvaluator {
    repo_root: Option<PathBuf>,
}

impl DirectiveEvaluator {
    /// Create an evaluator. `repo_root` anchors `@path` reads and is the
    /// working directory for commands.
    #[must_use]
    pub fn new(repo_root: Option<PathBuf>) -> Self {
        Self {
            repo_root,
        }
    }

    /// The configured repo root, if any.
    #[must_use]
    pub fn repo_root(&self) -> Option<&Path> {
        self.repo_root.as_deref()
    }

    fn valid_repo_root(&self) -> Option<&Path> {
        self.repo_root.as_deref().filter(|root| root.is_dir())
    }

    /// Evaluate one value. `key_path` is only used in diagnostics.
    #[must_use]
    pub fn evaluate(&self, key_path: &str, value: &str) -> String {
        if TEMPLATE_DELIMITERS.iter().any(|delimiter| value.contains(delimiter)) {
            tracing::debug!("Skipping directive evaluation for '{key_path}': value still contains template syntax");
            return value.to_string();
        }

        if let Some(uri) = value.strip_prefix(FILE_URI_PREFIX) {
            return match file_uri_to_path(uri) {
                Some(path) => read_text(key_path, &path),
                None => {
                    tracing::warn!("Invalid file URI for '{key_path}': {value}");
                    PLACEHOLDER_INVALID_URI.to_string()
                }
            };
        }

        if let Some(relative) = value.strip_prefix(REPO_FILE_PREFIX) {
            let relative = relative.trim_start_matches('/');
            let Some(root) = self.valid_repo_root() else {
                tracing::warn!(
                    "Cannot resolve '@{relative}' for '{key_path}': repo_root is undefined or not a directory"
                );
                return PLACEHOLDER_REPO_ROOT_UNDEFINED.to_string();
            };
            return read_text(key_path, &root.join(relative));
        }

        if let Some(command) = value.strip_prefix(COMMAND_PREFIX) {
            return self.run_command(key_path, command);
        }

        value.to_string()
    }

    fn run_command(&self, key_path: &str, command: &str) -> String {
        let (shell, flag) = get_shell_command();
        let mut process = Command::new(shell);
        process.arg(flag).arg(command);
        if let Some(root) = self.valid_repo_root() {
            process.current_dir(root);
        }

        tracing::debug!("Running command for '{key_path}': {command}");
        match process.output() {
            Ok(output) if output.status.success() => {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            }
            Ok(output) => {
                tracing::warn!(
                    "Command for '{key_path}' failed ({}): {command}\n{}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                PLACEHOLDER_COMMAND_FAILED.to_string()
            }
            Err(e) => {
                tracing::warn!("Failed to run command for '{key_path}': {command}: {e}");
                PLACEHOLDER_COMMAND_FAILED.to_string()
            }
        }
    }
}

/// Decode the part of a file URI after the scheme into a path.
///
/// Relative paths are anchored at the current working directory.
fn file_uri_to_path(uri: &str) -> Option<PathBuf> {
    let end = uri.find(['?', '#']).unwrap_or(uri.len());
    let decoded = urlencoding::decode(&uri[..end]).ok()?;
    if decoded.is_empty() {
        return None;
    }

    // `/C:/dir` on Windows names the drive, not a rooted path
    let path_str = match decoded.strip_prefix('/') {
        Some(rest) if is_windows() && rest.contains(':') => rest,
        _ => &*decoded,
    };

    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        Some(path)
    } else {
        std::env::current_dir().ok().map(|cwd| cwd.join(path))
    }
}

fn read_text(key_path: &str, path: &Path) -> String {
    if !path.is_file() {
        tracing::warn!("File referenced by '{key_path}' not found: {}", path.display());
        return PLACEHOLDER_FILE_NOT_FOUND.to_string();
    }
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Failed to read '{}' for '{key_path}': {e}", path.display());
            PLACEHOLDER_READ_FAILED.to_string()
        }
    }
}
