//! Integration test suite for RenderKit
//!
//! End-to-end tests driving the `rk` binary and the library pipeline against
//! temporary projects.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: Mode selection, flags and exit codes
//! - **directives**: `@path`, `file://` and `!command` values
//! - **laziness**: Values nobody references are never evaluated
//! - **loader**: Configuration layering through the command line
//! - **ordering**: Dependency order and cycle detection

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cli;
mod directives;
mod laziness;
mod loader;
mod ordering;
