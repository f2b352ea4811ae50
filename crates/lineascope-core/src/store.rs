//! The entity store boundary.
//!
//! [`EntityStore`] is the narrow contract the graph builder consumes: given
//! an id and kind, produce the entity's display name and its direction-tagged
//! neighbor references. Implementations sit over a local cache, a saved
//! metadata snapshot, or the live vendor API; the builder does not care
//! which, and any write-through caching an implementation performs is its
//! own business.
//!
//! Vendor wire shapes are normalized here, once, via the
//! `ResolvedEntity::from_*` constructors over the [`crate::types::raw`]
//! union. Nothing downstream of this module ever inspects a raw record.

use crate::error::LineageError;
use crate::types::raw::{RawCard, RawDataflow, RawDataset};
use crate::types::{Direction, EdgeVia, EntityKind};
use async_trait::async_trait;

/// A direction-tagged reference to a neighboring entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborRef {
    pub id: String,
    pub kind: EntityKind,
    /// Which side of the current entity the neighbor sits on.
    pub direction: Direction,
    /// Whether the relationship passes through a dataflow or is direct.
    pub via: EdgeVia,
}

impl NeighborRef {
    pub fn new(
        id: impl Into<String>,
        kind: EntityKind,
        direction: Direction,
        via: EdgeVia,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            direction,
            via,
        }
    }
}

/// One entity's metadata plus its immediate neighborhood.
///
/// Neighbor order is the order the backing record listed them in; the
/// builder preserves it so edge discovery order is stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntity {
    pub id: String,
    pub kind: EntityKind,
    pub name: String,
    pub neighbors: Vec<NeighborRef>,
}

impl ResolvedEntity {
    /// Normalizes a dataset record: producing dataflows upstream, consuming
    /// dataflows downstream, cards downstream via direct reference.
    pub fn from_dataset(raw: &RawDataset) -> Self {
        let mut neighbors = Vec::new();
        for id in &raw.producer_dataflow_ids {
            neighbors.push(NeighborRef::new(
                id,
                EntityKind::Dataflow,
                Direction::Upstream,
                EdgeVia::Dataflow,
            ));
        }
        for id in &raw.consumer_dataflow_ids {
            neighbors.push(NeighborRef::new(
                id,
                EntityKind::Dataflow,
                Direction::Downstream,
                EdgeVia::Dataflow,
            ));
        }
        for id in &raw.card_ids {
            neighbors.push(NeighborRef::new(
                id,
                EntityKind::Card,
                Direction::Downstream,
                EdgeVia::Direct,
            ));
        }
        Self {
            id: raw.id.clone(),
            kind: EntityKind::Dataset,
            name: raw.name.clone(),
            neighbors,
        }
    }

    /// Normalizes a dataflow record regardless of which wire shape it
    /// arrived in: input datasets upstream, output datasets downstream.
    pub fn from_dataflow(raw: &RawDataflow) -> Self {
        let mut neighbors = Vec::new();
        for id in raw.input_ids() {
            neighbors.push(NeighborRef::new(
                id,
                EntityKind::Dataset,
                Direction::Upstream,
                EdgeVia::Dataflow,
            ));
        }
        for id in raw.output_ids() {
            neighbors.push(NeighborRef::new(
                id,
                EntityKind::Dataset,
                Direction::Downstream,
                EdgeVia::Dataflow,
            ));
        }
        Self {
            id: raw.id().to_string(),
            kind: EntityKind::Dataflow,
            name: raw.name().to_string(),
            neighbors,
        }
    }

    /// Normalizes a card record: its datasets are upstream, directly.
    pub fn from_card(raw: &RawCard) -> Self {
        let neighbors = raw
            .dataset_ids
            .iter()
            .map(|id| {
                NeighborRef::new(id, EntityKind::Dataset, Direction::Upstream, EdgeVia::Direct)
            })
            .collect();
        Self {
            id: raw.id.clone(),
            kind: EntityKind::Card,
            name: raw.title.clone(),
            neighbors,
        }
    }

    /// Neighbors on one side, in record order.
    pub fn neighbors_in(&self, direction: Direction) -> impl Iterator<Item = &NeighborRef> {
        self.neighbors
            .iter()
            .filter(move |n| n.direction == direction)
    }
}

/// Fetches a single entity's metadata and immediate neighbor ids.
///
/// # Errors
///
/// - [`LineageError::NotFound`] when the backing store has no such id.
/// - [`LineageError::UpstreamUnavailable`] when a live fetch failed and no
///   cached record exists.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn resolve_node(
        &self,
        id: &str,
        kind: EntityKind,
    ) -> Result<ResolvedEntity, LineageError>;
}
