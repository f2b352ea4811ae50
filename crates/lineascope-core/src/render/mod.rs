//! Rendering a graph and its traversal result into output formats.
//!
//! All three formats are deterministic: text and Mermaid follow edge
//! discovery order, JSON canonicalizes node order by id. Rendering never
//! fails — whatever subgraph was gathered is printable, with incompleteness
//! carried in the output rather than raised as an error.

pub mod json;
pub mod mermaid;
pub mod text;

use crate::types::{EntityKind, LineageGraph, TraversalResult};
use std::collections::BTreeSet;

/// Output format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFormat {
    /// Indented tree text.
    Text,
    /// Mermaid `graph TD` diagram source.
    Mermaid,
    /// Canonically ordered JSON document.
    Json,
}

/// Restricts rendered output to a subset of entity kinds.
///
/// Filtering is a presentation concern: it never affects how the graph was
/// built or traversed. Filtered-out nodes are elided from output; tree
/// rendering still descends through them so their visible relatives keep
/// showing up.
#[derive(Debug, Clone, Default)]
pub struct KindFilter {
    allowed: Option<BTreeSet<EntityKind>>,
}

impl KindFilter {
    /// Allows every kind.
    pub fn all() -> Self {
        Self { allowed: None }
    }

    /// Allows only the given kinds.
    pub fn only(kinds: impl IntoIterator<Item = EntityKind>) -> Self {
        Self {
            allowed: Some(kinds.into_iter().collect()),
        }
    }

    pub fn allows(&self, kind: EntityKind) -> bool {
        match &self.allowed {
            None => true,
            Some(set) => set.contains(&kind),
        }
    }
}

/// Projects a graph and traversal result into the requested format.
pub fn render(graph: &LineageGraph, result: &TraversalResult, format: RenderFormat) -> String {
    render_filtered(graph, result, format, &KindFilter::all())
}

/// [`render`] with a kind filter applied to the output.
pub fn render_filtered(
    graph: &LineageGraph,
    result: &TraversalResult,
    format: RenderFormat,
    filter: &KindFilter,
) -> String {
    match format {
        RenderFormat::Text => text::render(graph, filter),
        RenderFormat::Mermaid => mermaid::render(graph, filter),
        RenderFormat::Json => json::render(graph, result, filter, false),
    }
}
