//! Core types shared across RenderKit.
//!
//! - [`error`] - [`RenderKitError`], [`ErrorContext`], and CLI error formatting

pub mod error;

pub use error::{ErrorContext, RenderKitError, create_error_context, user_friendly_error};
