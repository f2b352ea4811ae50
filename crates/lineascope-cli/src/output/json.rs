//! JSON output for the direct parents/children commands.
//!
//! Graph-level JSON comes straight from the core renderer; this module only
//! covers the single-hop neighbor listings, keyed the same way the vendor's
//! lineage payloads key entities.

use lineascope_core::{make_entity_key, EntityKind, LineageNode};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NeighborEntry<'a> {
    key: String,
    id: &'a str,
    kind: EntityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    resolved: bool,
}

/// Format direct parents/children as a JSON array.
pub fn format_neighbors_json(nodes: &[&LineageNode], compact: bool) -> String {
    let entries: Vec<NeighborEntry<'_>> = nodes
        .iter()
        .map(|node| NeighborEntry {
            key: make_entity_key(node.kind, &node.id),
            id: &node.id,
            kind: node.kind,
            name: node.name.as_deref(),
            resolved: node.resolved,
        })
        .collect();

    if compact {
        serde_json::to_string(&entries).expect("serialization cannot fail")
    } else {
        serde_json::to_string_pretty(&entries).expect("serialization cannot fail")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_carry_vendor_keys() {
        let node = LineageNode::resolved("f1", EntityKind::Dataflow, "ETL");
        let out = format_neighbors_json(&[&node], true);
        assert!(out.contains("\"key\":\"DATAFLOWf1\""));
        assert!(out.contains("\"kind\":\"dataflow\""));
        assert!(out.contains("\"resolved\":true"));
    }

    #[test]
    fn test_stub_omits_name() {
        let node = LineageNode::stub("d9", EntityKind::Dataset);
        let out = format_neighbors_json(&[&node], true);
        assert!(!out.contains("\"name\""));
        assert!(out.contains("\"resolved\":false"));
    }

    #[test]
    fn test_empty_listing() {
        assert_eq!(format_neighbors_json(&[], true), "[]");
    }
}
