//! Shared in-memory entity store for the integration suites.

use async_trait::async_trait;
use lineascope_core::types::raw::{RawCard, RawDataflow, RawDataflowV2, RawDataset};
use lineascope_core::{EntityKind, EntityStore, LineageError, ResolvedEntity};
use std::collections::{HashMap, HashSet};

/// A synthetic entity store backed by normalized records.
///
/// Ids are unique across kinds here, which keeps test fixtures short; the
/// store still checks the requested kind against the stored one.
#[derive(Default)]
pub struct MemoryStore {
    entities: HashMap<String, ResolvedEntity>,
    unavailable: HashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, entity: ResolvedEntity) -> Self {
        self.entities.insert(entity.id.clone(), entity);
        self
    }

    /// Marks an id as failing with `UpstreamUnavailable` on fetch.
    pub fn unavailable(mut self, id: &str) -> Self {
        self.unavailable.insert(id.to_string());
        self
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn resolve_node(
        &self,
        id: &str,
        kind: EntityKind,
    ) -> Result<ResolvedEntity, LineageError> {
        if self.unavailable.contains(id) {
            return Err(LineageError::unavailable(kind, id, "synthetic outage"));
        }
        match self.entities.get(id) {
            Some(entity) if entity.kind == kind => Ok(entity.clone()),
            _ => Err(LineageError::not_found(kind, id)),
        }
    }
}

/// Builds a dataset entity through the raw-record normalization path.
pub fn dataset(
    id: &str,
    name: &str,
    producers: &[&str],
    consumers: &[&str],
    cards: &[&str],
) -> ResolvedEntity {
    ResolvedEntity::from_dataset(&RawDataset {
        id: id.to_string(),
        name: name.to_string(),
        producer_dataflow_ids: to_owned(producers),
        consumer_dataflow_ids: to_owned(consumers),
        card_ids: to_owned(cards),
    })
}

/// Builds a dataflow entity (v2 wire shape).
pub fn dataflow(id: &str, name: &str, inputs: &[&str], outputs: &[&str]) -> ResolvedEntity {
    ResolvedEntity::from_dataflow(&RawDataflow::V2(RawDataflowV2 {
        id: id.to_string(),
        name: name.to_string(),
        input_dataset_ids: to_owned(inputs),
        output_dataset_ids: to_owned(outputs),
    }))
}

/// Builds a card entity.
pub fn card(id: &str, title: &str, datasets: &[&str]) -> ResolvedEntity {
    ResolvedEntity::from_card(&RawCard {
        id: id.to_string(),
        title: title.to_string(),
        dataset_ids: to_owned(datasets),
    })
}

fn to_owned(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}
