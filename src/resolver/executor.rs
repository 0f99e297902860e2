//! Plan execution.
//!
//! Walks an [`ExecutionPlan`] in order over a single mutable context that
//! starts as a copy of the raw document. Each step resolves one leaf and
//! writes it back, so later steps always see fully resolved dependencies.

use serde_json::Value;

use super::directive::DirectiveEvaluator;
use super::plan::ExecutionPlan;
use crate::document::{Document, get_path, is_dynamic, set_path, strip_marker};
use crate::templating::TemplateRenderer;

/// Evaluates a compiled plan.
pub struct PlanExecutor<'a> {
    renderer: &'a TemplateRenderer,
    evaluator: &'a DirectiveEvaluator,
}

impl<'a> PlanExecutor<'a> {
    #[must_use]
    pub fn new(renderer: &'a TemplateRenderer, evaluator: &'a DirectiveEvaluator) -> Self {
        Self {
            renderer,
            evaluator,
        }
    }

    /// Run every step of `plan` and return the resolved context.
    ///
    /// Paths outside the plan keep their raw values.
    #[must_use]
    pub fn execute(&self, plan: &ExecutionPlan<'_>, document: &Document) -> Document {
        let mut context = document.clone();

        for node in plan.steps() {
            let Value::String(raw) = node.raw_value() else {
                continue;
            };

            let value = if is_dynamic(raw) {
                let source = strip_marker(raw);
                let scope = namespace_scope(&context, node.namespace());
                match self.renderer.render(source, &scope) {
                    Ok(rendered) => rendered,
                    Err(e) => {
                        tracing::warn!("Failed to render '{}', using it unrendered: {e}", node.key_path());
                        source.to_string()
                    }
                }
            } else {
                raw.clone()
            };

            let resolved = self.evaluator.evaluate(node.key_path(), &value);
            if !set_path(&mut context, node.key_path(), Value::String(resolved)) {
                tracing::warn!("Could not write resolved value for '{}'", node.key_path());
            }
        }

        context
    }
}

/// The context with `namespace`'s own entries also exposed unqualified.
///
/// Unqualified entries shadow same-named top-level keys.
pub(crate) fn namespace_scope(context: &Document, namespace: &str) -> Document {
    let mut scope = context.clone();
    if let Some(Value::Object(entries)) = get_path(context, namespace) {
        scope.extend(entries.iter().map(|(key, value)| (key.clone(), value.clone())));
    }
    scope
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::dependency_graph::DependencyGraph;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn run(value: Value) -> Value {
        let document = value.as_object().cloned().unwrap();
        let renderer = TemplateRenderer::new();
        let evaluator = DirectiveEvaluator::default();
        let graph = DependencyGraph::build(&document, &renderer);
        let relevant: BTreeSet<String> = graph.key_paths().map(str::to_string).collect();
        let plan = ExecutionPlan::compile(&graph, &relevant).unwrap();
        Value::Object(PlanExecutor::new(&renderer, &evaluator).execute(&plan, &document))
    }

    #[test]
    fn test_chain_resolves_in_order() {
        let resolved = run(json!({
            "a": "static",
            "b": "${{ a }}/sub",
            "c": "${{ b }}/leaf"
        }));
        assert_eq!(resolved["c"], json!("static/sub/leaf"));
    }

    #[test]
    fn test_namespace_entries_are_unqualified() {
        let resolved = run(json!({
            "name": "global",
            "KOS": { "name": "kos", "greeting": "$hello {{ name }}", "full": "${{ greeting }}!" }
        }));
        assert_eq!(resolved["KOS"]["full"], json!("hello kos!"));
    }

    #[test]
    fn test_non_strings_pass_through() {
        let resolved = run(json!({ "n": 3, "flag": false, "list": [1, "{{ n }}"] }));
        assert_eq!(resolved, json!({ "n": 3, "flag": false, "list": [1, "{{ n }}"] }));
    }

    #[test]
    fn test_render_failure_falls_back_to_source() {
        let resolved = run(json!({ "bad": "${{ x | no_such_filter }}" }));
        assert_eq!(resolved["bad"], json!("{{ x | no_such_filter }}"));
    }

    #[test]
    #[cfg(unix)]
    fn test_rendered_command_is_executed() {
        let resolved = run(json!({ "word": "hi", "cmd": "$!echo {{ word }}" }));
        assert_eq!(resolved["cmd"], json!("hi"));
    }

    #[test]
    fn test_untouched_paths_keep_raw_values() {
        let document = json!({ "a": "x", "b": "$!exit 1" }).as_object().cloned().unwrap();
        let renderer = TemplateRenderer::new();
        let evaluator = DirectiveEvaluator::default();
        let graph = DependencyGraph::build(&document, &renderer);
        let plan = ExecutionPlan::compile(&graph, &BTreeSet::from(["a".to_string()])).unwrap();

        let resolved = PlanExecutor::new(&renderer, &evaluator).execute(&plan, &document);
        assert_eq!(resolved.get("b"), Some(&json!("$!exit 1")));
    }

    #[test]
    fn test_namespace_scope_shadows_globals() {
        let context = json!({ "v": "global", "ns": { "v": "local" } }).as_object().cloned().unwrap();
        assert_eq!(namespace_scope(&context, "ns").get("v"), Some(&json!("local")));
        assert_eq!(namespace_scope(&context, "").get("v"), Some(&json!("global")));
    }
}
