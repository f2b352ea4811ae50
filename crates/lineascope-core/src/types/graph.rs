//! The in-memory lineage graph and its derived result types.
//!
//! A [`LineageGraph`] is built once per command invocation and is read-only
//! afterwards: traversal and rendering never mutate it. Nodes live in an
//! id-keyed map; edges keep their discovery order so rendering is
//! deterministic without re-sorting.
//!
//! # Invariants
//!
//! - Node ids are unique.
//! - No duplicate `(from, to, via)` edge exists.
//! - Self-loops are filtered at insertion (a known quirk of upstream data,
//!   not an error).
//! - Every edge endpoint exists in the node map; [`LineageGraph::add_edge`]
//!   refuses edges that would dangle.

use crate::types::entity::EntityKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Traversal direction relative to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward producers: dataflows that write an entity's inputs.
    Upstream,
    /// Toward consumers: entities fed by this one.
    Downstream,
}

/// How an edge connects two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EdgeVia {
    /// The relationship passes through a dataflow job.
    Dataflow,
    /// A direct reference, e.g. dataset -> card.
    Direct,
}

/// A node in the lineage graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineageNode {
    /// Platform-assigned identifier (GUID for datasets, numeric-or-string
    /// for dataflows and cards).
    pub id: String,

    /// Entity type.
    pub kind: EntityKind,

    /// Display name when resolved; `None` for stub nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// True when full metadata was fetched. False for nodes only referenced
    /// by id (depth limit reached, or the fetch failed).
    pub resolved: bool,
}

impl LineageNode {
    /// A node referenced by id but not yet expanded.
    pub fn stub(id: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            id: id.into(),
            kind,
            name: None,
            resolved: false,
        }
    }

    /// A fully fetched node.
    pub fn resolved(id: impl Into<String>, kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: Some(name.into()),
            resolved: true,
        }
    }
}

/// A directed edge: `from_id` produces input consumed by `to_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineageEdge {
    pub from_id: String,
    pub to_id: String,
    pub via: EdgeVia,
}

/// A directed dependency graph rooted at one entity.
#[derive(Debug, Clone)]
pub struct LineageGraph {
    root_id: String,
    root_kind: EntityKind,
    nodes: HashMap<String, LineageNode>,
    /// Discovery order; rendering relies on this for determinism.
    edges: Vec<LineageEdge>,
    edge_keys: HashSet<String>,
    complete: bool,
}

impl LineageGraph {
    /// Creates a graph containing only the (stub) root node.
    pub fn new(root_id: impl Into<String>, root_kind: EntityKind) -> Self {
        let root_id = root_id.into();
        let mut nodes = HashMap::new();
        nodes.insert(root_id.clone(), LineageNode::stub(root_id.clone(), root_kind));
        Self {
            root_id,
            root_kind,
            nodes,
            edges: Vec::new(),
            edge_keys: HashSet::new(),
            complete: true,
        }
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    pub fn root_kind(&self) -> EntityKind {
        self.root_kind
    }

    /// Adds a stub node if the id is not already present. Returns true when
    /// a new node was inserted.
    pub fn add_stub(&mut self, id: &str, kind: EntityKind) -> bool {
        if self.nodes.contains_key(id) {
            return false;
        }
        self.nodes.insert(id.to_string(), LineageNode::stub(id, kind));
        true
    }

    /// Marks a node resolved and fills its name, inserting it first if
    /// needed. The only in-place mutation a node ever sees is this
    /// stub-to-resolved flip.
    pub fn resolve_node(&mut self, id: &str, kind: EntityKind, name: &str) {
        let node = self
            .nodes
            .entry(id.to_string())
            .or_insert_with(|| LineageNode::stub(id, kind));
        node.resolved = true;
        node.name = Some(name.to_string());
    }

    /// Adds a directed edge, filtering self-loops and duplicates.
    ///
    /// Both endpoints must already exist in the node map; an edge to an
    /// unknown id is dropped (and reported by the `false` return) rather
    /// than allowed to dangle.
    pub fn add_edge(&mut self, from_id: &str, to_id: &str, via: EdgeVia) -> bool {
        if from_id == to_id {
            return false;
        }
        if !self.nodes.contains_key(from_id) || !self.nodes.contains_key(to_id) {
            return false;
        }
        let key = format!("{from_id}->{to_id}:{via:?}");
        if !self.edge_keys.insert(key) {
            return false;
        }
        self.edges.push(LineageEdge {
            from_id: from_id.to_string(),
            to_id: to_id.to_string(),
            via,
        });
        true
    }

    /// Flags the graph as truncated or partially resolved.
    pub fn mark_incomplete(&mut self) {
        self.complete = false;
    }

    /// True when no bound was hit and every fetch succeeded.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn node(&self, id: &str) -> Option<&LineageNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &LineageNode> {
        self.nodes.values()
    }

    /// Edges in discovery order.
    pub fn edges(&self) -> &[LineageEdge] {
        &self.edges
    }

    /// Aggregate counts for the summary table.
    pub fn summary(&self) -> GraphSummary {
        let mut nodes_by_kind = BTreeMap::new();
        for node in self.nodes.values() {
            *nodes_by_kind.entry(node.kind).or_insert(0) += 1;
        }
        GraphSummary {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            nodes_by_kind,
            complete: self.complete,
        }
    }
}

/// Result of a full ancestor/descendant traversal. Excludes the root.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct TraversalResult {
    /// Ids reachable by following edges backward from the root.
    pub ancestors: BTreeSet<String>,

    /// Ids reachable by following edges forward from the root.
    pub descendants: BTreeSet<String>,

    /// Ancestor counts grouped by entity kind.
    pub ancestor_counts: BTreeMap<EntityKind, usize>,

    /// Descendant counts grouped by entity kind.
    pub descendant_counts: BTreeMap<EntityKind, usize>,

    /// False when the graph was truncated by a bound or contains
    /// unresolved ancestor/descendant nodes.
    pub complete: bool,
}

/// Node and edge counts for one built graph.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes_by_kind: BTreeMap<EntityKind, usize>,
    pub complete: bool,
}
