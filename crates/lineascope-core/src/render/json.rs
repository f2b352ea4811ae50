//! Canonical JSON document rendering.

use crate::render::KindFilter;
use crate::types::{EntityKind, LineageEdge, LineageGraph, LineageNode, TraversalResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The JSON projection of a graph plus its traversal result.
///
/// Internal storage order is discovery order, but this document is
/// canonicalized for stable comparisons: nodes are sorted by id, counts live
/// in ordered maps, and edges keep discovery order (itself deterministic).
/// Rendering the same graph twice yields byte-identical output.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineageDocument {
    pub root_id: String,
    pub nodes: Vec<LineageNode>,
    pub edges: Vec<LineageEdge>,
    pub ancestor_counts: BTreeMap<EntityKind, usize>,
    pub descendant_counts: BTreeMap<EntityKind, usize>,
    pub complete: bool,
}

/// Builds the canonical document, applying the kind filter to nodes, edges,
/// and counts alike.
pub fn document(
    graph: &LineageGraph,
    result: &TraversalResult,
    filter: &KindFilter,
) -> LineageDocument {
    let mut nodes: Vec<LineageNode> = graph
        .nodes()
        .filter(|n| filter.allows(n.kind))
        .cloned()
        .collect();
    nodes.sort_by(|a, b| a.id.cmp(&b.id));

    let edges: Vec<LineageEdge> = graph
        .edges()
        .iter()
        .filter(|e| {
            let from_ok = graph.node(&e.from_id).is_some_and(|n| filter.allows(n.kind));
            let to_ok = graph.node(&e.to_id).is_some_and(|n| filter.allows(n.kind));
            from_ok && to_ok
        })
        .cloned()
        .collect();

    let keep_counts = |counts: &BTreeMap<EntityKind, usize>| {
        counts
            .iter()
            .filter(|(kind, _)| filter.allows(**kind))
            .map(|(kind, n)| (*kind, *n))
            .collect()
    };

    LineageDocument {
        root_id: graph.root_id().to_string(),
        nodes,
        edges,
        ancestor_counts: keep_counts(&result.ancestor_counts),
        descendant_counts: keep_counts(&result.descendant_counts),
        complete: result.complete,
    }
}

/// Serializes the canonical document.
pub fn render(
    graph: &LineageGraph,
    result: &TraversalResult,
    filter: &KindFilter,
    compact: bool,
) -> String {
    let doc = document(graph, result, filter);
    if compact {
        serde_json::to_string(&doc).expect("serialization cannot fail")
    } else {
        serde_json::to_string_pretty(&doc).expect("serialization cannot fail")
    }
}
