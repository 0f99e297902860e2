//! Execution plan compilation.
//!
//! The relevant subgraph is loaded into a `petgraph` directed graph with one
//! edge per retained dependency (`dependent -> dependency`). Dependencies on
//! key paths outside the relevant set are dropped. Cycles are reported with
//! their members in discovery order; otherwise the topological order is
//! reversed so that every dependency precedes its dependents.
//!
//! Nodes are inserted in sorted key-path order and edges in sorted dependency
//! order, so the same input always compiles to the same plan.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeSet, HashMap};

use super::dependency_graph::{DependencyGraph, Node};
use crate::core::RenderKitError;

/// Color states for cycle detection using DFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Node has not been visited.
    White,
    /// Node is on the current DFS path.
    Gray,
    /// Node and everything below it has been visited.
    Black,
}

/// Nodes in an order where every retained dependency precedes its dependents.
#[derive(Debug)]
pub struct ExecutionPlan<'g> {
    steps: Vec<&'g Node>,
}

impl<'g> ExecutionPlan<'g> {
    /// Compile a plan for the relevant subset of a graph.
    ///
    /// Key paths in `relevant` that are not graph nodes are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RenderKitError::CircularDependency`] if the restricted
    /// graph contains a cycle. No plan is produced in that case.
    pub fn compile(
        graph: &'g DependencyGraph,
        relevant: &BTreeSet<String>,
    ) -> Result<Self, RenderKitError> {
        let mut restricted: DiGraph<&'g Node, ()> = DiGraph::new();
        let mut index: HashMap<&str, NodeIndex> = HashMap::new();

        for key in relevant {
            if let Some(node) = graph.get(key) {
                index.insert(node.key_path(), restricted.add_node(node));
            }
        }

        for key in relevant {
            let (Some(node), Some(&from)) = (graph.get(key), index.get(key.as_str())) else {
                continue;
            };
            for dependency in node.dependencies() {
                if let Some(&to) = index.get(dependency.as_str()) {
                    restricted.update_edge(from, to, ());
                }
            }
        }

        detect_cycles(&restricted)?;

        let order = toposort(&restricted, None).map_err(|cycle| RenderKitError::CircularDependency {
            cycle: restricted[cycle.node_id()].key_path().to_string(),
        })?;

        let steps: Vec<&'g Node> = order.into_iter().rev().map(|idx| restricted[idx]).collect();
        tracing::debug!("Compiled execution plan with {} step(s)", steps.len());
        Ok(Self {
            steps,
        })
    }

    /// Plan steps in execution order.
    #[must_use]
    pub fn steps(&self) -> &[&'g Node] {
        &self.steps
    }

    /// Key paths in execution order.
    #[must_use]
    pub fn key_paths(&self) -> Vec<&'g str> {
        self.steps.iter().map(|node| node.key_path()).collect()
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Fail with the first cycle found, walking nodes in insertion order.
fn detect_cycles(graph: &DiGraph<&Node, ()>) -> Result<(), RenderKitError> {
    let mut colors: Vec<Color> = vec![Color::White; graph.node_count()];

    for node in graph.node_indices() {
        if colors[node.index()] == Color::White {
            if let Some(cycle) = find_cycle(graph, node, &mut colors) {
                let cycle = cycle
                    .iter()
                    .map(|idx| graph[*idx].key_path())
                    .collect::<Vec<_>>()
                    .join(" -> ");
                return Err(RenderKitError::CircularDependency {
                    cycle,
                });
            }
        }
    }

    Ok(())
}

/// One node on the DFS path and the neighbors still to visit.
struct Frame {
    node: NodeIndex,
    neighbors: Vec<NodeIndex>,
    next: usize,
}

impl Frame {
    fn enter(graph: &DiGraph<&Node, ()>, node: NodeIndex, colors: &mut [Color]) -> Self {
        colors[node.index()] = Color::Gray;
        // Neighbors come back newest-edge-first; sort for a stable report
        let mut neighbors: Vec<NodeIndex> = graph.neighbors(node).collect();
        neighbors.sort();
        Self {
            node,
            neighbors,
            next: 0,
        }
    }
}

/// Iterative DFS from `start`. Returns `Some(cycle)` with the closing node
/// repeated at the end.
fn find_cycle(
    graph: &DiGraph<&Node, ()>,
    start: NodeIndex,
    colors: &mut [Color],
) -> Option<Vec<NodeIndex>> {
    let mut stack = vec![Frame::enter(graph, start, colors)];

    while let Some(frame) = stack.last_mut() {
        let Some(&neighbor) = frame.neighbors.get(frame.next) else {
            colors[frame.node.index()] = Color::Black;
            stack.pop();
            continue;
        };
        frame.next += 1;

        match colors[neighbor.index()] {
            Color::Gray => {
                let start = stack.iter().position(|f| f.node == neighbor).unwrap_or(0);
                let mut cycle: Vec<NodeIndex> = stack[start..].iter().map(|f| f.node).collect();
                cycle.push(neighbor);
                return Some(cycle);
            }
            Color::White => stack.push(Frame::enter(graph, neighbor, colors)),
            Color::Black => {}
        }
    }

    None
}
