//! Type definitions for the lineage engine.

pub mod entity;
pub mod graph;
pub mod raw;

pub use entity::{make_entity_key, EntityKey, EntityKind};
pub use graph::{
    Direction, EdgeVia, GraphSummary, LineageEdge, LineageGraph, LineageNode, TraversalResult,
};
pub use raw::{DataflowIo, MergedDataflow, RawCard, RawDataflow, RawDataflowV1, RawDataflowV2, RawDataset};
