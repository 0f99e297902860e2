//! Platform-specific helpers.
//!
//! Covers the two places RenderKit touches the host directly: choosing a
//! shell for `!command` values, and turning user-supplied path strings
//! (which may carry `~` or `$VAR`) into real paths.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Returns the shell and its "run this string" flag for the current platform.
///
/// - **Windows**: `("cmd", "/C")`
/// - **Unix-like**: `("sh", "-c")`
#[must_use]
pub const fn get_shell_command() -> (&'static str, &'static str) {
    if is_windows() {
        ("cmd", "/C")
    } else {
        ("sh", "-c")
    }
}

/// Expands `~` and environment variables in a path string.
///
/// # Errors
///
/// Returns an error if the path references an undefined environment variable
/// or the home directory cannot be determined.
///
/// # Examples
///
/// ```rust,no_run
/// use renderkit::utils::platform::expand_path;
///
/// # fn example() -> anyhow::Result<()> {
/// let root = expand_path("~/projects/site")?;
/// println!("{}", root.display());
/// # Ok(())
/// # }
/// ```
pub fn expand_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path).with_context(|| {
        let platform_vars = if is_windows() {
            "Common Windows variables: $USERPROFILE, $APPDATA, $TEMP"
        } else {
            "Common Unix variables: $HOME, $USER, $TMP"
        };
        format!(
            "Failed to expand path: {path}\n\n\
            Check for undefined environment variables.\n\
            {platform_vars}"
        )
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Expands a path string and anchors it at `base` when it is relative.
///
/// # Errors
///
/// Same as [`expand_path`].
pub fn resolve_path(path: &str, base: &Path) -> Result<PathBuf> {
    let expanded = expand_path(path)?;
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(base.join(expanded))
    }
}
