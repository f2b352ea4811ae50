//! Bounded bidirectional lineage graph construction.
//!
//! # Architecture
//!
//! [`GraphBuilder`] runs a breadth-first traversal from a root entity over an
//! [`EntityStore`]. Each BFS layer is resolved concurrently (fire-and-await
//! the whole layer), but membership decisions are made synchronously before
//! any fetch is dispatched: a node enters the visited set when it is
//! enqueued, never after, so two paths reaching the same node cannot both
//! schedule an expansion for it. Neighbor processing stays in record order,
//! which keeps edge discovery order deterministic for rendering.
//!
//! # Bounds and completeness
//!
//! - `max_depth`: nodes at the depth limit are recorded but not expanded.
//! - `max_nodes`: the traversal stops outright once the graph holds this
//!   many nodes.
//!
//! Hitting either bound, or degrading a failed fetch, flips the graph's
//! `complete` flag. A fetch failure for one node leaves it as an unresolved
//! stub and the traversal continues with its siblings; only a missing *root*
//! aborts the build.
//!
//! Each build owns its own visited set and graph; nothing is shared across
//! invocations. Cancelling the returned future abandons in-flight fetches
//! and drops the partial graph.

use crate::error::LineageError;
use crate::store::EntityStore;
use crate::types::{Direction, EntityKind, LineageGraph};
use futures::future::join_all;
use std::collections::HashSet;
#[cfg(feature = "tracing")]
use tracing::debug;

/// Traversal parameters. Direction flags are always caller-supplied; the
/// core has no implicit default direction.
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// Follow producer relationships (toward ancestors).
    pub traverse_up: bool,
    /// Follow consumer relationships (toward descendants).
    pub traverse_down: bool,
    /// Maximum hops from the root along the traversed direction(s).
    pub max_depth: usize,
    /// Maximum total nodes recorded before the traversal stops.
    pub max_nodes: usize,
}

/// Builds a [`LineageGraph`] from an [`EntityStore`].
pub struct GraphBuilder<'a, S: EntityStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: EntityStore + ?Sized> GraphBuilder<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Runs the bounded BFS and returns the built graph.
    ///
    /// # Errors
    ///
    /// [`LineageError::NotFound`] when the root id does not exist. A root
    /// whose fetch merely failed (`UpstreamUnavailable`) degrades to a
    /// single unresolved node with `complete = false` instead, matching the
    /// partial-result policy for every other node.
    pub async fn build(
        &self,
        root_id: &str,
        root_kind: EntityKind,
        opts: BuildOptions,
    ) -> Result<LineageGraph, LineageError> {
        let mut graph = LineageGraph::new(root_id, root_kind);
        let mut visited: HashSet<(EntityKind, String)> = HashSet::new();
        visited.insert((root_kind, root_id.to_string()));

        match self.store.resolve_node(root_id, root_kind).await {
            Ok(root) => {
                graph.resolve_node(&root.id, root.kind, &root.name);
                let mut frontier = vec![root];
                let mut depth = 0usize;

                while !frontier.is_empty() && depth < opts.max_depth {
                    depth += 1;
                    #[cfg(feature = "tracing")]
                    debug!(depth, layer = frontier.len(), "expanding BFS layer");

                    let mut next_ids: Vec<(String, EntityKind)> = Vec::new();
                    let mut stopped = false;

                    for entity in &frontier {
                        for neighbor in &entity.neighbors {
                            let wanted = match neighbor.direction {
                                Direction::Upstream => opts.traverse_up,
                                Direction::Downstream => opts.traverse_down,
                            };
                            if !wanted {
                                continue;
                            }

                            if !graph.contains(&neighbor.id) {
                                if graph.node_count() >= opts.max_nodes {
                                    graph.mark_incomplete();
                                    stopped = true;
                                    break;
                                }
                                graph.add_stub(&neighbor.id, neighbor.kind);
                            }

                            match neighbor.direction {
                                Direction::Upstream => {
                                    graph.add_edge(&neighbor.id, &entity.id, neighbor.via);
                                }
                                Direction::Downstream => {
                                    graph.add_edge(&entity.id, &neighbor.id, neighbor.via);
                                }
                            }

                            // Test-and-set before any fetch for this node can
                            // be dispatched; a node is expanded at most once
                            // no matter how many paths reach it.
                            let key = (neighbor.kind, neighbor.id.clone());
                            if visited.insert(key) {
                                next_ids.push((neighbor.id.clone(), neighbor.kind));
                            }
                        }
                        if stopped {
                            break;
                        }
                    }

                    if stopped {
                        break;
                    }

                    if depth >= opts.max_depth {
                        // The next layer was recorded but will not expand.
                        if !next_ids.is_empty() {
                            graph.mark_incomplete();
                        }
                        break;
                    }

                    frontier = self.resolve_layer(&mut graph, next_ids).await;
                }

                Ok(graph)
            }
            Err(err) if matches!(err, LineageError::UpstreamUnavailable { .. }) => {
                #[cfg(feature = "tracing")]
                debug!(%root_id, "root fetch failed, returning unresolved stub graph");
                graph.mark_incomplete();
                Ok(graph)
            }
            Err(err) => Err(err),
        }
    }

    /// Resolves one BFS layer concurrently, in enqueue order.
    ///
    /// Failed fetches are degraded in place: the node stays an unresolved
    /// stub and the graph is marked incomplete. Only entities that resolved
    /// are returned for further expansion.
    async fn resolve_layer(
        &self,
        graph: &mut LineageGraph,
        ids: Vec<(String, EntityKind)>,
    ) -> Vec<crate::store::ResolvedEntity> {
        let fetches = ids
            .iter()
            .map(|(id, kind)| self.store.resolve_node(id, *kind));
        let results = join_all(fetches).await;

        let mut resolved = Vec::with_capacity(results.len());
        for ((_id, _kind), result) in ids.into_iter().zip(results) {
            match result {
                Ok(entity) => {
                    graph.resolve_node(&entity.id, entity.kind, &entity.name);
                    resolved.push(entity);
                }
                // Fetch failures degrade in place. Structural store errors
                // are not expected mid traversal and get the same treatment
                // rather than losing the partial graph.
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    debug!(id = %_id, error = %_err, "degrading failed fetch to unresolved stub");
                    graph.mark_incomplete();
                }
            }
        }
        resolved
    }
}
