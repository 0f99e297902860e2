//! Template engine adapter over MiniJinja.
//!
//! RenderKit consumes exactly two capabilities from its template engine:
//! static analysis (template source to the set of free identifiers) and
//! rendering against a scope. [`TemplateRenderer`] provides both with a single
//! configured [`Environment`], so that dependency discovery and rendering can
//! never disagree about syntax.

use minijinja::{Environment, Value};
use std::collections::BTreeSet;

use super::error::TemplateError;
use crate::document::Document;

/// Template renderer wrapping a MiniJinja environment.
///
/// The environment renders without autoescaping, strips the first newline
/// after a block tag and leading whitespace before it, and renders undefined
/// variables as empty strings.
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// Create a renderer with RenderKit's environment settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            env: Self::environment(),
        }
    }

    fn environment<'source>() -> Environment<'source> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env
    }

    /// Top-level names the template reads but never defines itself.
    ///
    /// `{{ KOS.version }}` yields `KOS`; loop variables and `{% set %}`
    /// targets are excluded.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::SyntaxError`] if the source does not parse.
    pub fn free_identifiers(&self, source: &str) -> Result<BTreeSet<String>, TemplateError> {
        // Compiled templates borrow their source for the environment's lifetime
        let env = Self::environment();
        let template = env.template_from_str(source)?;
        Ok(template.undeclared_variables(false).into_iter().collect())
    }

    /// Render template source against a document scope.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] on malformed syntax or a failing
    /// expression (e.g. calling an unknown filter).
    pub fn render(&self, source: &str, scope: &Document) -> Result<String, TemplateError> {
        tracing::trace!("Rendering {} byte template against {} keys", source.len(), scope.len());
        Ok(self.env.render_str(source, scope)?)
    }

    /// Render template source against an arbitrary engine value.
    ///
    /// Used to render against dynamic objects such as recording proxies.
    ///
    /// # Errors
    ///
    /// Same as [`render`](Self::render).
    pub fn render_value(&self, source: &str, scope: Value) -> Result<String, TemplateError> {
        Ok(self.env.render_str(source, scope)?)
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}
