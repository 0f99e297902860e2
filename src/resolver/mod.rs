//! Lazy, dependency-ordered resolution of configuration documents.
//!
//! A document is resolved in five stages:
//!
//! 1. [`dependency_graph`] - one node per leaf, with edges to the key paths its
//!    template references
//! 2. [`requirements`] - the key paths the consumer templates actually touch
//! 3. [`pruning`] - the relevant subgraph: the touched paths plus everything
//!    they transitively depend on
//! 4. [`plan`] - a topological order over the relevant subgraph, failing on
//!    cycles
//! 5. [`executor`] - render each planned value and evaluate its
//!    [`directive`]
//!
//! Values outside the relevant subgraph are never rendered, read or
//! executed. [`Pipeline`] ties the stages together.
//!
//! # Example
//!
//! ```rust,no_run
//! use renderkit::resolver::Pipeline;
//! use serde_json::json;
//!
//! # fn example() -> Result<(), renderkit::core::RenderKitError> {
//! let document = json!({
//!     "NS": { "light": "Safe", "heavy": "$!touch sentinel" }
//! });
//! let document = document.as_object().cloned().unwrap_or_default();
//!
//! let pipeline = Pipeline::new();
//! let resolved = pipeline.resolve(&document, &["{{ NS.light }}"], None)?;
//! // NS.heavy was never executed
//! # Ok(())
//! # }
//! ```

pub mod dependency_graph;
pub mod directive;
pub mod executor;
pub mod plan;
pub mod pruning;
pub mod requirements;

pub use dependency_graph::{DependencyGraph, Node};
pub use directive::DirectiveEvaluator;
pub use executor::PlanExecutor;
pub use plan::ExecutionPlan;
pub use pruning::{narrow_requirements, relevant_subgraph};
pub use requirements::{RequirementAnalyzer, RequirementSet};

use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;

use crate::core::RenderKitError;
use crate::document::{Document, get_path};
use crate::templating::TemplateRenderer;

/// End-to-end resolver for one document and a batch of consumer templates.
#[derive(Default)]
pub struct Pipeline {
    renderer: TemplateRenderer,
}

impl Pipeline {
    /// Create a pipeline with the default template environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The template engine shared by every stage.
    #[must_use]
    pub fn renderer(&self) -> &TemplateRenderer {
        &self.renderer
    }

    /// Resolve the parts of `document` that `consumers` need.
    ///
    /// With no consumers at all every value is resolved. Consumers that
    /// reference nothing, or whose references cannot be discovered, resolve
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`RenderKitError::CircularDependency`] if the relevant values
    /// reference each other in a cycle. Nothing is evaluated in that case.
    pub fn resolve(
        &self,
        document: &Document,
        consumers: &[&str],
        repo_root: Option<&Path>,
    ) -> Result<Document, RenderKitError> {
        let graph = DependencyGraph::build(document, &self.renderer);
        let relevant: BTreeSet<String> = if consumers.is_empty() {
            tracing::debug!("No consumer templates, selecting all {} value(s)", graph.len());
            graph.key_paths().map(str::to_string).collect()
        } else {
            let requirements = RequirementAnalyzer::new(&self.renderer).analyze(document, consumers);
            relevant_subgraph(&graph, &requirements)
        };
        tracing::info!("Resolving {} of {} value(s)", relevant.len(), graph.len());

        let plan = ExecutionPlan::compile(&graph, &relevant)?;
        let evaluator = DirectiveEvaluator::new(repo_root.map(Path::to_path_buf));
        Ok(PlanExecutor::new(&self.renderer, &evaluator).execute(&plan, document))
    }

    /// The render scope for a consumer template scoped to one namespace.
    ///
    /// When `scope` names a mapping in `context`, its entries are also exposed
    /// at the top level. A dotted scope (`KOS.build`) names a nested mapping.
    /// Otherwise the context is returned unchanged.
    #[must_use]
    pub fn scoped(&self, context: &Document, scope: &str) -> Document {
        match get_path(context, scope) {
            Some(Value::Object(_)) => executor::namespace_scope(context, scope),
            Some(_) => {
                tracing::warn!("Scope '{scope}' is not a mapping, rendering without scope");
                context.clone()
            }
            None => {
                tracing::warn!("Scope '{scope}' not found in configuration, rendering without scope");
                context.clone()
            }
        }
    }
}
