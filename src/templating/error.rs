//! Template engine errors.

use std::fmt;

/// Failure reported by the template engine.
#[derive(Debug, Clone)]
pub enum TemplateError {
    /// The source could not be parsed.
    SyntaxError {
        message: String,
        line: Option<usize>,
    },

    /// The source parsed but rendering it failed.
    RenderFailed {
        message: String,
        line: Option<usize>,
    },
}

impl TemplateError {
    /// Line number reported by the engine, if any.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::SyntaxError {
                line,
                ..
            }
            | Self::RenderFailed {
                line,
                ..
            } => *line,
        }
    }

    /// True for parse failures.
    #[must_use]
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, Self::SyntaxError { .. })
    }
}

impl From<minijinja::Error> for TemplateError {
    fn from(error: minijinja::Error) -> Self {
        let message = match error.detail() {
            Some(detail) => format!("{}: {detail}", error.kind()),
            None => error.kind().to_string(),
        };
        let line = error.line();

        if matches!(error.kind(), minijinja::ErrorKind::SyntaxError) {
            Self::SyntaxError {
                message,
                line,
            }
        } else {
            Self::RenderFailed {
                message,
                line,
            }
        }
    }
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, message) = match self {
            Self::SyntaxError {
                message,
                ..
            } => ("Template syntax error", message),
            Self::RenderFailed {
                message,
                ..
            } => ("Template render error", message),
        };
        match self.line() {
            Some(line) => write!(f, "{kind} (line {line}): {message}"),
            None => write!(f, "{kind}: {message}"),
        }
    }
}

impl std::error::Error for TemplateError {}
