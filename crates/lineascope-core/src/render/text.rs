//! Indented tree text rendering.

use crate::render::KindFilter;
use crate::traverse::{direct_children, direct_parents};
use crate::types::{LineageGraph, LineageNode};
use std::collections::HashSet;

/// Renders the graph as an indented tree: the root, its descendant subtree,
/// then its ancestor subtree.
///
/// Cycles were eliminated when the graph was built, but a node can still be
/// reachable along two edges (diamonds); a printed set local to the call
/// keeps each node to one appearance.
pub fn render(graph: &LineageGraph, filter: &KindFilter) -> String {
    let mut lines = Vec::new();
    let mut printed: HashSet<String> = HashSet::new();

    let root = graph
        .node(graph.root_id())
        .expect("graph invariant: root node always exists");
    printed.insert(root.id.clone());
    lines.push(node_line(root, 0));

    let children = visible_subtree(graph, &root.id, filter, &mut printed, Walk::Down);
    if !children.is_empty() {
        lines.push("Children:".to_string());
        lines.extend(children);
    }

    let parents = visible_subtree(graph, &root.id, filter, &mut printed, Walk::Up);
    if !parents.is_empty() {
        lines.push("Parents:".to_string());
        lines.extend(parents);
    }

    lines.join("\n")
}

#[derive(Clone, Copy)]
enum Walk {
    Up,
    Down,
}

/// Depth-first walk in one direction, collecting node lines.
///
/// Filtered-out nodes are elided but still walked through, at the same
/// indent, so their visible relatives remain in the tree.
fn visible_subtree(
    graph: &LineageGraph,
    from: &str,
    filter: &KindFilter,
    printed: &mut HashSet<String>,
    walk: Walk,
) -> Vec<String> {
    let mut lines = Vec::new();
    walk_into(graph, from, filter, printed, walk, 1, &mut lines);
    lines
}

fn walk_into(
    graph: &LineageGraph,
    from: &str,
    filter: &KindFilter,
    printed: &mut HashSet<String>,
    walk: Walk,
    depth: usize,
    lines: &mut Vec<String>,
) {
    let neighbors = match walk {
        Walk::Down => direct_children(graph, from),
        Walk::Up => direct_parents(graph, from),
    };

    for node in neighbors {
        if !printed.insert(node.id.clone()) {
            continue;
        }
        if filter.allows(node.kind) {
            lines.push(node_line(node, depth));
            walk_into(graph, &node.id, filter, printed, walk, depth + 1, lines);
        } else {
            walk_into(graph, &node.id, filter, printed, walk, depth, lines);
        }
    }
}

fn node_line(node: &LineageNode, depth: usize) -> String {
    let name = node.name.as_deref().unwrap_or("unresolved");
    format!("{:indent$}{} ({}) [{name}]", "", node.kind, node.id, indent = depth * 2)
}
