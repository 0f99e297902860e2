//! Error handling for RenderKit
//!
//! RenderKit separates failures into two classes:
//! 1. **Structural errors** ([`RenderKitError`]) abort a render before any
//!    directive is evaluated: a dependency cycle, an unparsable configuration
//!    file, a missing template directory.
//! 2. **Per-value failures** never surface here. A missing file or failing
//!    command degrades only its own value to a placeholder string and is
//!    reported through `tracing`.
//!
//! At the CLI boundary any error is converted with [`user_friendly_error`]
//! into an [`ErrorContext`] carrying details and a suggestion.
//!
//! # Examples
//!
//! ```rust,no_run
//! use renderkit::core::{RenderKitError, user_friendly_error};
//!
//! let error = RenderKitError::CircularDependency {
//!     cycle: "a -> b -> a".to_string(),
//! };
//! let context = user_friendly_error(anyhow::Error::from(error));
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for RenderKit operations.
#[derive(Error, Debug, Clone)]
pub enum RenderKitError {
    /// Two or more values reference each other through templates.
    ///
    /// The cycle lists the member key paths in discovery order and closes
    /// with the first member again, e.g. `a -> b -> a`.
    #[error("Circular dependency detected: {cycle}")]
    CircularDependency {
        /// Human-readable cycle description
        cycle: String,
    },

    /// A configuration file could not be parsed.
    #[error("Failed to parse configuration file {path}: {reason}")]
    ConfigParse {
        /// The file that failed to parse
        path: String,
        /// The parser's message
        reason: String,
    },

    /// A configuration file parsed but does not have the expected shape.
    #[error("Invalid configuration document {path}: {message}")]
    InvalidDocument {
        /// The offending file
        path: String,
        /// What was wrong with it
        message: String,
    },

    /// Directory mode was requested but there is no template directory.
    #[error("Template directory not found: {path}")]
    TemplateDirNotFound {
        /// The directory that was expected
        path: String,
    },

    /// A template was supplied both on stdin and with `--template`.
    #[error("Cannot read a template from stdin and --template at the same time")]
    ConflictingTemplateInputs,

    /// The consumer template itself failed to render.
    #[error("Failed to render template '{name}': {message}")]
    TemplateRender {
        /// Template name (file path or `<stdin>`)
        name: String,
        /// Engine error message
        message: String,
    },

    /// Any other error.
    #[error("{message}")]
    Other {
        /// Error description
        message: String,
    },
}

/// An error paired with user-facing details and a suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: RenderKitError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: RenderKitError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: error in red, details in yellow,
    /// suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] suitable for CLI display.
///
/// Recognizes [`RenderKitError`] (anywhere in the context chain) and
/// [`std::io::Error`]; everything else is wrapped as
/// [`RenderKitError::Other`] with the full context chain as its message.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(renderkit_error) = error.downcast_ref::<RenderKitError>() {
        return create_error_context(renderkit_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        let context = ErrorContext::new(RenderKitError::Other {
            message: format!("{error:#}"),
        });
        return match io_error.kind() {
            std::io::ErrorKind::NotFound => context
                .with_suggestion("Check that the file or directory exists and the path is correct"),
            std::io::ErrorKind::PermissionDenied => {
                context.with_suggestion("Check the file permissions or run from a different directory")
            }
            _ => context,
        };
    }

    ErrorContext::new(RenderKitError::Other {
        message: format!("{error:#}"),
    })
}

/// Attach the standard details and suggestion for a [`RenderKitError`].
#[must_use]
pub fn create_error_context(error: RenderKitError) -> ErrorContext {
    match &error {
        RenderKitError::CircularDependency {
            ..
        } => ErrorContext::new(error)
            .with_details("Values referencing each other can never be resolved; nothing was rendered")
            .with_suggestion("Break the cycle by replacing one of the references with a static value"),
        RenderKitError::ConfigParse {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the YAML syntax of the file (indentation, quoting of '{{' and ':')"),
        RenderKitError::InvalidDocument {
            ..
        } => ErrorContext::new(error).with_details(
            "config.yaml must be a mapping; namespace files must be a mapping or a list of single-key mappings",
        ),
        RenderKitError::TemplateDirNotFound {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Create a 'templates' directory, or pass a template with --template or on stdin",
        ),
        RenderKitError::ConflictingTemplateInputs => ErrorContext::new(error)
            .with_suggestion("Use either piped stdin or --template, or pass --no-stdin"),
        _ => ErrorContext::new(error),
    }
}
