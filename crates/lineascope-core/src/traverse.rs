//! Traversal and query operations over a built [`LineageGraph`].
//!
//! The graph is immutable by the time these run; everything here is a read.
//! Ancestors follow edges backward (`to -> from`), descendants forward, both
//! transitively and both excluding the root itself.

use crate::types::{EntityKind, LineageGraph, LineageNode, TraversalResult};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// Computes the full ancestor/descendant closure for a graph's root.
///
/// `complete` propagates the graph's own flag and is additionally cleared
/// when any reachable node is unresolved: an unexpanded stub means the
/// closure beyond it is unknown.
pub fn compute_traversal(graph: &LineageGraph) -> TraversalResult {
    let mut forward: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut backward: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in graph.edges() {
        forward
            .entry(edge.from_id.as_str())
            .or_default()
            .push(edge.to_id.as_str());
        backward
            .entry(edge.to_id.as_str())
            .or_default()
            .push(edge.from_id.as_str());
    }

    let ancestors = closure(graph.root_id(), &backward);
    let descendants = closure(graph.root_id(), &forward);

    let any_unresolved = ancestors
        .iter()
        .chain(descendants.iter())
        .filter_map(|id| graph.node(id))
        .any(|node| !node.resolved);

    TraversalResult {
        ancestor_counts: count_by_kind(graph, &ancestors),
        descendant_counts: count_by_kind(graph, &descendants),
        ancestors,
        descendants,
        complete: graph.is_complete() && !any_unresolved,
    }
}

/// Nodes with an edge pointing at `id`, in edge discovery order.
pub fn direct_parents<'g>(graph: &'g LineageGraph, id: &str) -> Vec<&'g LineageNode> {
    graph
        .edges()
        .iter()
        .filter(|e| e.to_id == id)
        .filter_map(|e| graph.node(&e.from_id))
        .collect()
}

/// Nodes `id` has an edge pointing at, in edge discovery order.
pub fn direct_children<'g>(graph: &'g LineageGraph, id: &str) -> Vec<&'g LineageNode> {
    graph
        .edges()
        .iter()
        .filter(|e| e.from_id == id)
        .filter_map(|e| graph.node(&e.to_id))
        .collect()
}

/// Transitive reachability from `start`, excluding `start`.
fn closure(start: &str, adjacency: &HashMap<&str, Vec<&str>>) -> BTreeSet<String> {
    let mut seen: HashSet<&str> = HashSet::from([start]);
    let mut queue: VecDeque<&str> = VecDeque::from([start]);
    let mut reached = BTreeSet::new();

    while let Some(current) = queue.pop_front() {
        if let Some(nexts) = adjacency.get(current) {
            for &next in nexts {
                if seen.insert(next) {
                    reached.insert(next.to_string());
                    queue.push_back(next);
                }
            }
        }
    }

    reached
}

fn count_by_kind(graph: &LineageGraph, ids: &BTreeSet<String>) -> BTreeMap<EntityKind, usize> {
    let mut counts = BTreeMap::new();
    for id in ids {
        if let Some(node) = graph.node(id) {
            *counts.entry(node.kind).or_insert(0) += 1;
        }
    }
    counts
}
