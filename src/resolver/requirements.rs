//! Requirement discovery for consumer templates.
//!
//! Before anything with side effects runs, the analyzer works out which key
//! paths the templates being rendered actually touch. It combines two
//! advisory passes:
//!
//! - a **static pass** collecting each template's free top-level identifiers;
//! - a **dry-run pass** rendering each template against a
//!   [`RecordingProxy`] of the raw document and collecting every
//!   fully-qualified path looked up.
//!
//! Failures in either pass are logged at debug level and skipped.

use std::collections::BTreeSet;

use crate::document::Document;
use crate::templating::{AccessRecorder, RecordingProxy, TemplateRenderer};

/// Key paths and bare names requested by consumer templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementSet {
    paths: BTreeSet<String>,
}

impl RequirementSet {
    /// Create an empty requirement set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a requested path.
    pub fn insert(&mut self, path: impl Into<String>) {
        self.paths.insert(path.into());
    }

    /// Whether a path was requested.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Requested paths in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Number of requested paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether nothing was requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for RequirementSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for RequirementSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.paths.extend(iter.into_iter().map(Into::into));
    }
}

/// Discovers the requirement set of one or more consumer templates.
pub struct RequirementAnalyzer<'a> {
    renderer: &'a TemplateRenderer,
}

impl<'a> RequirementAnalyzer<'a> {
    /// Create an analyzer using the given template engine.
    #[must_use]
    pub fn new(renderer: &'a TemplateRenderer) -> Self {
        Self {
            renderer,
        }
    }

    /// Collect everything the consumer templates reference.
    ///
    /// Returns an empty set when there are no consumers or none of them
    /// references anything.
    #[must_use]
    pub fn analyze(&self, document: &Document, consumers: &[&str]) -> RequirementSet {
        let mut requirements = self.static_pass(consumers);
        requirements.extend(self.dry_run_pass(document, consumers));
        tracing::debug!(
            "Discovered {} requirement(s) from {} template(s)",
            requirements.len(),
            consumers.len()
        );
        requirements
    }

    fn static_pass(&self, consumers: &[&str]) -> RequirementSet {
        let mut requirements = RequirementSet::new();
        for source in consumers {
            match self.renderer.free_identifiers(source) {
                Ok(identifiers) => requirements.extend(identifiers),
                Err(e) => tracing::debug!("Static analysis skipped a template: {e}"),
            }
        }
        requirements
    }

    fn dry_run_pass(&self, document: &Document, consumers: &[&str]) -> BTreeSet<String> {
        let recorder = AccessRecorder::new();
        for source in consumers {
            let proxy = RecordingProxy::root(document, recorder.clone());
            if let Err(e) = self.renderer.render_value(source, proxy) {
                tracing::debug!("Dry run skipped a template: {e}");
            }
        }
        recorder.accessed_paths()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analyze(document: serde_json::Value, consumers: &[&str]) -> Vec<String> {
        let document = document.as_object().cloned().unwrap();
        let renderer = TemplateRenderer::new();
        RequirementAnalyzer::new(&renderer)
            .analyze(&document, consumers)
            .iter()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_static_and_dry_run_are_combined() {
        let paths = analyze(
            json!({ "NS": { "light": "Safe", "heavy": "$!touch x" } }),
            &["{{ NS.light }}"],
        );
        assert_eq!(paths, vec!["NS", "NS.light"]);
    }

    #[test]
    fn test_batch_accumulates_all_templates() {
        let paths = analyze(json!({ "a": 1, "b": 2, "c": 3 }), &["{{ a }}", "{{ c }}"]);
        assert_eq!(paths, vec!["a", "c"]);
    }

    #[test]
    fn test_broken_template_is_skipped() {
        let paths = analyze(json!({ "a": 1 }), &["{{ a", "{{ a }}"]);
        assert_eq!(paths, vec!["a"]);
    }

    #[test]
    fn test_no_consumers_is_empty() {
        let paths = analyze(json!({ "a": 1 }), &[]);
        assert!(paths.is_empty());
    }

    #[test]
    fn test_unqualified_scope_names_are_recorded() {
        let paths = analyze(json!({ "KOS": { "version": "1" } }), &["{{ version }}"]);
        assert_eq!(paths, vec!["version"]);
    }
}
