//! Subgraph pruning.
//!
//! Turns a [`RequirementSet`] into the *relevant set*: the key paths that
//! must be evaluated for the requested paths to be fully resolved, and nothing
//! else.
//!
//! The requested paths are first narrowed: a path is dropped only when some
//! other requested path extends it (`NS` is dropped when `NS.light` is also
//! requested). Each remaining path seeds the frontier with every graph key
//! that
//! - equals it,
//! - lies under it (`NS` seeds `NS.light` and `NS.heavy`),
//! - ends with it (`version` seeds `KOS.version`, for scope-injected names), or
//! - is a leaf it reaches into (`cmd.stdout` seeds `cmd`).
//!
//! The frontier is then closed over dependency edges.

use std::collections::BTreeSet;

use super::dependency_graph::DependencyGraph;
use super::requirements::RequirementSet;

/// Drop every requested path that another requested path extends.
#[must_use]
pub fn narrow_requirements(requirements: &RequirementSet) -> BTreeSet<String> {
    let requested: BTreeSet<&str> = requirements.iter().collect();
    requested
        .iter()
        .filter(|path| {
            let prefix = format!("{path}.");
            !requested.iter().any(|other| other.starts_with(&prefix))
        })
        .map(|path| (*path).to_string())
        .collect()
}

/// Compute the relevant set for a requirement set.
///
/// An empty requirement set selects nothing.
#[must_use]
pub fn relevant_subgraph(graph: &DependencyGraph, requirements: &RequirementSet) -> BTreeSet<String> {
    let narrowed = narrow_requirements(requirements);
    let mut stack: Vec<String> = graph
        .key_paths()
        .filter(|key| narrowed.iter().any(|candidate| seeds(candidate, key)))
        .map(str::to_string)
        .collect();

    let mut relevant = BTreeSet::new();
    while let Some(current) = stack.pop() {
        if !relevant.insert(current.clone()) {
            continue;
        }
        if let Some(node) = graph.get(&current) {
            stack.extend(node.dependencies().iter().filter(|dep| !relevant.contains(*dep)).cloned());
        }
    }

    tracing::debug!(
        "Pruned dependency graph from {} to {} nodes",
        graph.len(),
        relevant.len()
    );
    relevant
}

/// Whether a requested path selects a graph key as a starting point.
fn seeds(candidate: &str, key: &str) -> bool {
    key == candidate
        || key.strip_prefix(candidate).is_some_and(|rest| rest.starts_with('.'))
        || key.strip_suffix(candidate).is_some_and(|rest| rest.ends_with('.'))
        || candidate.strip_prefix(key).is_some_and(|rest| rest.starts_with('.'))
}
