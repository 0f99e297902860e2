//! Template engine integration.
//!
//! - [`renderer`] - [`TemplateRenderer`], static identifier extraction and rendering
//! - [`tracker`] - [`RecordingProxy`] and [`AccessRecorder`] for dry-run discovery
//! - [`error`] - [`TemplateError`]
//!
//! Templates use Jinja syntax (`{{ value }}`, `{% if %}`, `{% for %}`). The
//! engine itself is MiniJinja; RenderKit only relies on its static analysis,
//! its rendering, and its support for dynamic objects in the render scope.

pub mod error;
pub mod renderer;
pub mod tracker;

pub use error::TemplateError;
pub use renderer::TemplateRenderer;
pub use tracker::{AccessRecorder, RecordingProxy};
