//! Test utilities for RenderKit
//!
//! Helpers shared by unit and integration tests: one-time logging setup and
//! [`TestProject`], a temporary project directory with the standard layout.
//!
//! # Example
//!
//! ```rust,no_run
//! use renderkit::test_utils::TestProject;
//!
//! # fn example() -> anyhow::Result<()> {
//! let project = TestProject::new()?
//!     .with_config("name: demo\n")?
//!     .with_namespace("KOS-main", "- version: 1.0.0\n")?
//!     .with_template("KOS/readme.md", "{{ version }}")?;
//!
//! assert!(project.path().join("templates/KOS/readme.md").exists());
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::constants::{CONFIGS_DIR_NAME, GLOBAL_CONFIG_FILENAME, OUTPUTS_DIR_NAME, TEMPLATES_DIR_NAME};

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has any effect. Uses `level` when given, otherwise
/// `RUST_LOG`, otherwise leaves logging off.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// A temporary RenderKit project directory.
///
/// The directory is deleted when the value is dropped.
pub struct TestProject {
    temp_dir: TempDir,
}

impl TestProject {
    /// Create an empty project.
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new().context("Failed to create temp dir")?,
        })
    }

    /// Project root.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of a rendered output file.
    #[must_use]
    pub fn output_path(&self, relative: &str) -> PathBuf {
        self.path().join(OUTPUTS_DIR_NAME).join(relative)
    }

    /// Read a rendered output file.
    pub fn read_output(&self, relative: &str) -> Result<String> {
        let path = self.output_path(relative);
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// Write any file relative to the project root.
    pub fn write_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Write `config.yaml`.
    pub fn with_config(self, content: &str) -> Result<Self> {
        self.write_file(GLOBAL_CONFIG_FILENAME, content)?;
        Ok(self)
    }

    /// Write `configs/<stem>.yaml`.
    pub fn with_namespace(self, stem: &str, content: &str) -> Result<Self> {
        self.write_file(&format!("{CONFIGS_DIR_NAME}/{stem}.yaml"), content)?;
        Ok(self)
    }

    /// Write `templates/<relative>`.
    pub fn with_template(self, relative: &str, content: &str) -> Result<Self> {
        self.write_file(&format!("{TEMPLATES_DIR_NAME}/{relative}"), content)?;
        Ok(self)
    }

    /// Write a file relative to the project root.
    pub fn with_file(self, relative: &str, content: &str) -> Result<Self> {
        self.write_file(relative, content)?;
        Ok(self)
    }
}
