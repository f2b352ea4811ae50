//! Snapshot-backed entity store.
//!
//! A snapshot is a JSON capture of platform metadata (datasets, dataflows,
//! cards) exported ahead of time; it stands in for the live API plus local
//! cache behind the narrow [`EntityStore`] contract. Raw records are
//! normalized once at load, so lookups hand out pre-built entities.
//!
//! Entries listed under `unavailable` simulate records whose live fetch
//! failed when the snapshot was captured; resolving them surfaces
//! `UpstreamUnavailable`, which the graph builder degrades to an unresolved
//! stub.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lineascope_core::types::raw::{RawCard, RawDataflow, RawDataset};
use lineascope_core::{EntityKind, EntityStore, LineageError, ResolvedEntity};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// On-disk snapshot shape.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// When the capture was taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub datasets: Vec<RawDataset>,
    #[serde(default)]
    pub dataflows: Vec<RawDataflow>,
    #[serde(default)]
    pub cards: Vec<RawCard>,
    /// Ids whose fetch failed during capture.
    #[serde(default)]
    pub unavailable: Vec<String>,
}

/// An [`EntityStore`] over a loaded snapshot.
pub struct SnapshotStore {
    entities: HashMap<(EntityKind, String), ResolvedEntity>,
    unavailable: HashSet<String>,
    generated_at: Option<DateTime<Utc>>,
}

impl SnapshotStore {
    /// Reads and normalizes a snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut entities = HashMap::new();
        for raw in &snapshot.datasets {
            let entity = ResolvedEntity::from_dataset(raw);
            entities.insert((EntityKind::Dataset, entity.id.clone()), entity);
        }
        for raw in &snapshot.dataflows {
            let entity = ResolvedEntity::from_dataflow(raw);
            entities.insert((EntityKind::Dataflow, entity.id.clone()), entity);
        }
        for raw in &snapshot.cards {
            let entity = ResolvedEntity::from_card(raw);
            entities.insert((EntityKind::Card, entity.id.clone()), entity);
        }
        Self {
            entities,
            unavailable: snapshot.unavailable.into_iter().collect(),
            generated_at: snapshot.generated_at,
        }
    }

    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        self.generated_at
    }

    /// Entity counts as (datasets, dataflows, cards).
    pub fn counts(&self) -> (usize, usize, usize) {
        let count = |kind: EntityKind| {
            self.entities
                .keys()
                .filter(|(k, _)| *k == kind)
                .count()
        };
        (
            count(EntityKind::Dataset),
            count(EntityKind::Dataflow),
            count(EntityKind::Card),
        )
    }
}

#[async_trait]
impl EntityStore for SnapshotStore {
    async fn resolve_node(
        &self,
        id: &str,
        kind: EntityKind,
    ) -> Result<ResolvedEntity, LineageError> {
        if self.unavailable.contains(id) {
            return Err(LineageError::unavailable(
                kind,
                id,
                "marked unavailable in snapshot",
            ));
        }
        self.entities
            .get(&(kind, id.to_string()))
            .cloned()
            .ok_or_else(|| LineageError::not_found(kind, id))
    }
}
