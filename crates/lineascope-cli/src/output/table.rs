//! Human-readable summary output formatting.

use is_terminal::IsTerminal;
use lineascope_core::{make_entity_key, LineageGraph, LineageNode, TraversalResult};
use owo_colors::OwoColorize;
use std::fmt::Write;

/// Format a built graph and its traversal result as a human-readable
/// summary with optional colors.
pub fn format_summary(
    graph: &LineageGraph,
    result: &TraversalResult,
    use_colors: bool,
) -> String {
    let colored = use_colors && std::io::stdout().is_terminal();
    let mut out = String::new();

    write_header(&mut out, colored);
    write_root(&mut out, graph, colored);
    write_totals(&mut out, graph, result, colored);
    write_counts(&mut out, result);

    out
}

fn write_header(out: &mut String, colored: bool) {
    let title = "Lineascope Lineage";
    let line = "═".repeat(50);

    if colored {
        writeln!(out, "{}", title.bold()).unwrap();
        writeln!(out, "{}", line.dimmed()).unwrap();
    } else {
        writeln!(out, "{title}").unwrap();
        writeln!(out, "{line}").unwrap();
    }
}

fn write_root(out: &mut String, graph: &LineageGraph, colored: bool) {
    let root = graph.node(graph.root_id());
    let label = match root {
        Some(node) => format!(
            "Root: {} ({}) [{}]",
            node.kind,
            node.id,
            node.name.as_deref().unwrap_or("unresolved")
        ),
        None => format!("Root: {}", graph.root_id()),
    };

    if colored {
        writeln!(out, "{}", label.bold()).unwrap();
    } else {
        writeln!(out, "{label}").unwrap();
    }
    writeln!(out).unwrap();
}

fn write_totals(
    out: &mut String,
    graph: &LineageGraph,
    result: &TraversalResult,
    colored: bool,
) {
    let summary = graph.summary();
    let status = if result.complete {
        "complete"
    } else {
        "incomplete"
    };
    let stats = format!(
        "Summary: {} nodes | {} edges | {status}",
        summary.node_count, summary.edge_count
    );

    if colored {
        if result.complete {
            writeln!(out, "{}", stats.cyan()).unwrap();
        } else {
            writeln!(out, "{}", stats.yellow()).unwrap();
        }
    } else {
        writeln!(out, "{stats}").unwrap();
    }
    writeln!(out).unwrap();
}

fn write_counts(out: &mut String, result: &TraversalResult) {
    writeln!(out, "Ancestors: {}", result.ancestors.len()).unwrap();
    for (kind, count) in &result.ancestor_counts {
        writeln!(out, "  {kind}: {count}").unwrap();
    }
    writeln!(out, "Descendants: {}", result.descendants.len()).unwrap();
    for (kind, count) in &result.descendant_counts {
        writeln!(out, "  {kind}: {count}").unwrap();
    }
}

/// Format a direct parents/children listing.
pub fn format_neighbors(title: &str, nodes: &[&LineageNode]) -> String {
    let mut out = String::new();
    writeln!(out, "{title}").unwrap();

    if nodes.is_empty() {
        writeln!(out, "  (none)").unwrap();
        return out;
    }

    for node in nodes {
        writeln!(
            out,
            "  {}  {}  [{}]",
            make_entity_key(node.kind, &node.id),
            node.kind,
            node.name.as_deref().unwrap_or("unresolved")
        )
        .unwrap();
    }
    out
}
