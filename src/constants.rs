//! Shared constants for RenderKit.
//!
//! File layout names, the value-syntax sigils, and the placeholder strings
//! substituted for values whose evaluation failed.

/// Leading sigil marking a string value as template source.
pub const DYNAMIC_MARKER: char = '$';

/// Prefix of a value that is read from a file URI.
pub const FILE_URI_PREFIX: &str = "file://";

/// Prefix of a value that is read from a path relative to the repo root.
pub const REPO_FILE_PREFIX: char = '@';

/// Prefix of a value that is produced by a shell command.
pub const COMMAND_PREFIX: char = '!';

/// Sequences that mark a string as still containing unrendered template syntax.
pub const TEMPLATE_DELIMITERS: &[&str] = &["{{", "{%"];

/// Global project configuration file.
pub const GLOBAL_CONFIG_FILENAME: &str = "config.yaml";

/// Directory holding namespace configuration files.
pub const CONFIGS_DIR_NAME: &str = "configs";

/// Directory scanned for templates in directory mode.
pub const TEMPLATES_DIR_NAME: &str = "templates";

/// Directory receiving rendered templates in directory mode.
pub const OUTPUTS_DIR_NAME: &str = "outputs";

/// Document key naming the root used by `@path` reads and command execution.
pub const REPO_ROOT_KEY: &str = "repo_root";

/// Placeholder for an `@path` value when no valid repo root is known.
pub const PLACEHOLDER_REPO_ROOT_UNDEFINED: &str = "<render error: repo_root undefined>";

/// Placeholder for a referenced file that does not exist.
pub const PLACEHOLDER_FILE_NOT_FOUND: &str = "<render error: file not found>";

/// Placeholder for a referenced file that exists but could not be read.
pub const PLACEHOLDER_READ_FAILED: &str = "<render error: failed to read file>";

/// Placeholder for a `file://` value that cannot be decoded into a path.
pub const PLACEHOLDER_INVALID_URI: &str = "<render error: invalid file URI>";

/// Placeholder for a command that failed to start or exited non-zero.
pub const PLACEHOLDER_COMMAND_FAILED: &str = "<render error: command failed>";
