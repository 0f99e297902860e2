//! Cross-platform utilities.
//!
//! - [`fs`] - Directory creation and atomic file writes
//! - [`platform`] - Shell selection and path expansion

pub mod fs;
pub mod platform;

pub use fs::{atomic_write, ensure_dir};
pub use platform::{expand_path, get_shell_command, is_windows, resolve_path};
