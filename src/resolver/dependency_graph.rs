//! Dependency graph over the leaves of a configuration document.
//!
//! Every leaf becomes a [`Node`]. For string leaves the (marker-stripped)
//! value is parsed as template source and each free identifier is resolved to
//! the key paths it refers to. Resolution tries, in order:
//!
//! 1. a sibling in the node's own namespace (`namespace.identifier`), then
//! 2. an exact key path (`identifier`), then
//! 3. every key path under `identifier.` (a reference to a whole namespace).
//!
//! The first two stop at their first hit; the third adds all matches.
//! Identifiers that resolve to nothing are treated as external names.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::document::{Document, flatten, strip_marker};
use crate::templating::TemplateRenderer;

/// One leaf value and the key paths it must be evaluated after.
///
/// Nodes are created by [`DependencyGraph::build`] and never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    key_path: String,
    raw_value: Value,
    namespace: String,
    dependencies: BTreeSet<String>,
}

impl Node {
    /// Dotted key path of the leaf.
    #[must_use]
    pub fn key_path(&self) -> &str {
        &self.key_path
    }

    /// The value exactly as it appears in the raw document.
    #[must_use]
    pub fn raw_value(&self) -> &Value {
        &self.raw_value
    }

    /// Top-level ancestor key, empty for root-level leaves.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Key paths this node must be evaluated after.
    #[must_use]
    pub fn dependencies(&self) -> &BTreeSet<String> {
        &self.dependencies
    }
}

/// All nodes of a document, keyed by key path.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: BTreeMap<String, Node>,
}

impl DependencyGraph {
    /// Build the graph for a raw document.
    ///
    /// A value whose template source fails to parse gets no dependencies;
    /// the failure is logged and otherwise ignored.
    #[must_use]
    pub fn build(document: &Document, renderer: &TemplateRenderer) -> Self {
        let entries = flatten(document);
        let all_keys: BTreeSet<String> = entries.iter().map(|e| e.key_path.clone()).collect();

        let mut nodes = BTreeMap::new();
        for entry in entries {
            let dependencies = match entry.value {
                // Unmarked strings can still substitute other keys, so they are scanned too
                Value::String(raw) => match renderer.free_identifiers(strip_marker(raw)) {
                    Ok(identifiers) => identifiers
                        .iter()
                        .flat_map(|identifier| {
                            resolve_identifier(identifier, &entry.key_path, &entry.namespace, &all_keys)
                        })
                        .collect(),
                    Err(e) => {
                        tracing::debug!(
                            "Failed to parse template for '{}', assuming no dependencies: {e}",
                            entry.key_path
                        );
                        BTreeSet::new()
                    }
                },
                _ => BTreeSet::new(),
            };

            if !dependencies.is_empty() {
                tracing::trace!("{} depends on {:?}", entry.key_path, dependencies);
            }

            nodes.insert(
                entry.key_path.clone(),
                Node {
                    key_path: entry.key_path,
                    raw_value: entry.value.clone(),
                    namespace: entry.namespace,
                    dependencies,
                },
            );
        }

        tracing::debug!("Built dependency graph with {} nodes", nodes.len());
        Self {
            nodes,
        }
    }

    /// Look up a node by key path.
    #[must_use]
    pub fn get(&self, key_path: &str) -> Option<&Node> {
        self.nodes.get(key_path)
    }

    /// Whether a node exists at the key path.
    #[must_use]
    pub fn contains(&self, key_path: &str) -> bool {
        self.nodes.contains_key(key_path)
    }

    /// All nodes in key-path order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All key paths in sorted order.
    pub fn key_paths(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Resolve one free identifier of `key_path` to concrete key paths.
fn resolve_identifier(
    identifier: &str,
    key_path: &str,
    namespace: &str,
    all_keys: &BTreeSet<String>,
) -> Vec<String> {
    if !namespace.is_empty() {
        let sibling = format!("{namespace}.{identifier}");
        if all_keys.contains(&sibling) {
            return vec![sibling];
        }
    }

    if all_keys.contains(identifier) {
        return vec![identifier.to_string()];
    }

    let prefix = format!("{identifier}.");
    all_keys
        .range(prefix.clone()..)
        .take_while(|candidate| candidate.starts_with(&prefix))
        .filter(|candidate| candidate.as_str() != key_path)
        .cloned()
        .collect()
}
