//! RenderKit - lazy template rendering over layered configuration
//!
//! RenderKit renders Jinja templates against a nested configuration document
//! assembled from YAML files and command-line overrides. Configuration values
//! are more than literals:
//!
//! | Value | Meaning |
//! |-------|---------|
//! | `plain` | a literal |
//! | `$...` | template source, rendered against the document |
//! | `@path` | contents of a file under `repo_root` |
//! | `file://uri` | contents of a file by URI |
//! | `!command` | trimmed stdout of a shell command |
//!
//! A `$` value is rendered first and the result may itself be a directive:
//! `$!git -C {{ repo }} describe` runs the command with `repo` substituted.
//!
//! # Laziness
//!
//! Values are only evaluated when a template being rendered needs them. Given
//!
//! ```yaml
//! - light: Safe
//! - heavy: "$!./expensive-script.sh"
//! ```
//!
//! rendering `{{ NS.light }}` never runs the script. Needed values are
//! evaluated once, in dependency order, and a cycle between them is an error.
//!
//! # Core Modules
//!
//! - [`config`] - Loading and merging the configuration layers
//! - [`document`] - The nested document type and key-path helpers
//! - [`templating`] - MiniJinja integration and dry-run access recording
//! - [`resolver`] - Dependency graph, pruning, planning and evaluation
//! - [`output`] - Single-template and directory rendering
//! - [`cli`] - The `rk` command line
//! - [`core`] - Error types and user-facing error formatting
//!
//! # Example
//!
//! ```rust,no_run
//! use renderkit::config::{LoadOptions, load_document};
//! use renderkit::output::render_single;
//! use renderkit::resolver::Pipeline;
//!
//! # fn example() -> anyhow::Result<()> {
//! let loaded = load_document(&LoadOptions {
//!     project_root: "my-project".into(),
//!     ..LoadOptions::default()
//! })?;
//!
//! let output = render_single(&Pipeline::new(), &loaded, "<inline>", "v{{ KOS.version }}", None)?;
//! println!("{output}");
//! # Ok(())
//! # }
//! ```

// Core functionality modules
pub mod config;
pub mod constants;
pub mod core;
pub mod document;
pub mod resolver;
pub mod templating;

// Rendering surfaces
pub mod cli;
pub mod output;

// Supporting modules
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use document::Document;
pub use resolver::Pipeline;
