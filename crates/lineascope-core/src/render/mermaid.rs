//! Mermaid diagram source generation.

use crate::render::KindFilter;
use crate::types::{LineageGraph, LineageNode};
use std::collections::HashSet;

/// Renders the graph as a `graph TD` Mermaid diagram.
///
/// One line per edge, in discovery order. Node definition lines precede the
/// edges and appear in first-reference order, so output is stable across
/// runs. Labels quote the display name for resolved nodes and fall back to
/// the bare id for stubs.
pub fn render(graph: &LineageGraph, filter: &KindFilter) -> String {
    let mut lines = vec!["graph TD".to_string()];
    let mut defined: HashSet<String> = HashSet::new();
    let mut node_lines = Vec::new();
    let mut edge_lines = Vec::new();

    // The root is always present even in an edgeless graph.
    if let Some(root) = graph.node(graph.root_id()) {
        if filter.allows(root.kind) {
            define_node(root, &mut node_lines, &mut defined);
        }
    }

    for edge in graph.edges() {
        let (Some(from), Some(to)) = (graph.node(&edge.from_id), graph.node(&edge.to_id)) else {
            continue;
        };
        if !filter.allows(from.kind) || !filter.allows(to.kind) {
            continue;
        }
        define_node(from, &mut node_lines, &mut defined);
        define_node(to, &mut node_lines, &mut defined);
        edge_lines.push(format!(
            "    {} --> {}",
            sanitize_id(&edge.from_id),
            sanitize_id(&edge.to_id)
        ));
    }

    lines.extend(node_lines);
    lines.extend(edge_lines);
    lines.join("\n")
}

/// Emits a node definition line once per id.
fn define_node(node: &LineageNode, out: &mut Vec<String>, defined: &mut HashSet<String>) {
    if !defined.insert(node.id.clone()) {
        return;
    }
    let label = node.name.as_deref().unwrap_or(&node.id);
    out.push(format!(
        "    {}[\"{}\"]",
        sanitize_id(&node.id),
        escape_label(label)
    ));
}

/// Strips characters Mermaid cannot digest in node ids.
fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Escapes quotes and folds newlines for Mermaid labels.
fn escape_label(label: &str) -> String {
    label.replace('"', "\\\"").replace('\n', " ")
}
