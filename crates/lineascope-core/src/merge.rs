//! Merging the vendor's remote lineage responses into a [`LineageGraph`].
//!
//! The dedicated lineage endpoint returns a nested structure keyed by
//! `"<KIND><id>"`, each entry carrying `parents` and `children` arrays whose
//! elements recursively carry their own `parents`/`children` to an
//! API-controlled depth. This module walks that structure with an explicit
//! depth budget (malformed or cyclic payloads degrade to truncation, never
//! to unbounded recursion) and merges every entity into a single graph keyed
//! by id, so repeated references collapse instead of duplicating.
//!
//! Fatal versus degraded, following the crate error strategy:
//!
//! - Missing top-level key for the requested root: [`LineageError::NoLineageData`].
//! - A non-object entity or non-array `parents`/`children`: [`LineageError::Malformed`].
//! - Nesting deeper than [`MAX_NESTING_DEPTH`], or an entity tag this
//!   version does not model: recorded as incompleteness, the walk continues.

use crate::error::LineageError;
use crate::types::{make_entity_key, EdgeVia, EntityKind, LineageGraph};
use serde_json::Value;

/// Recursion budget for the nested payload walk. The vendor caps its own
/// nesting well below this; anything deeper is hostile or broken data.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Parses a remote lineage response into a graph rooted at `root_id`.
pub fn merge_remote_lineage(
    response: &Value,
    root_id: &str,
    root_kind: EntityKind,
) -> Result<LineageGraph, LineageError> {
    let entries = response
        .as_object()
        .ok_or_else(|| LineageError::malformed("$", "response is not an object"))?;

    let root_key = make_entity_key(root_kind, root_id);
    let entry = entries
        .get(&root_key)
        .ok_or(LineageError::NoLineageData {
            key: root_key.clone(),
        })?;

    let mut graph = LineageGraph::new(root_id, root_kind);
    let entry_path = format!("$.{root_key}");
    let merged_id = merge_entity(&mut graph, entry, &entry_path, MAX_NESTING_DEPTH)?;
    if let Some(id) = merged_id {
        if id != root_id {
            return Err(LineageError::malformed(
                entry_path,
                format!("entry id '{id}' does not match requested root '{root_id}'"),
            ));
        }
    }

    // The endpoint reports its own completeness; a false flag means the
    // server truncated the expansion before we ever saw it.
    if let Some(false) = entry.get("complete").and_then(Value::as_bool) {
        graph.mark_incomplete();
    }

    Ok(graph)
}

/// Records one nested entity and recurses into its relatives.
///
/// Returns the merged node's id, or `None` when the entity's tag is not one
/// this version models (the subtree is skipped and the graph marked
/// incomplete).
fn merge_entity(
    graph: &mut LineageGraph,
    entity: &Value,
    path: &str,
    budget: usize,
) -> Result<Option<String>, LineageError> {
    let obj = entity
        .as_object()
        .ok_or_else(|| LineageError::malformed(path, "entity is not an object"))?;

    let tag = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| LineageError::malformed(path, "entity has no string 'type'"))?;

    let id = match obj.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(LineageError::malformed(path, "entity has no usable 'id'")),
    };

    let Some(kind) = EntityKind::from_key_tag(tag) else {
        // Unknown entity type: skip the subtree rather than fail the merge.
        graph.mark_incomplete();
        return Ok(None);
    };

    match obj.get("name").and_then(Value::as_str) {
        Some(name) => graph.resolve_node(&id, kind, name),
        None => {
            graph.add_stub(&id, kind);
        }
    }

    if budget == 0 {
        // Depth guard hit: the node itself is recorded, its relatives are
        // truncated away.
        graph.mark_incomplete();
        return Ok(Some(id));
    }

    for (field, parents_side) in [("parents", true), ("children", false)] {
        let Some(value) = obj.get(field) else {
            continue;
        };
        let list = value.as_array().ok_or_else(|| {
            LineageError::malformed(format!("{path}.{field}"), "expected an array")
        })?;

        for (index, relative) in list.iter().enumerate() {
            let child_path = format!("{path}.{field}[{index}]");
            let Some(relative_id) = merge_entity(graph, relative, &child_path, budget - 1)? else {
                continue;
            };
            let relative_kind = graph
                .node(&relative_id)
                .map(|n| n.kind)
                .unwrap_or(kind);
            let via = edge_via(kind, relative_kind);
            if parents_side {
                graph.add_edge(&relative_id, &id, via);
            } else {
                graph.add_edge(&id, &relative_id, via);
            }
        }
    }

    Ok(Some(id))
}

/// Dataflow-mediated when either endpoint is a dataflow, direct otherwise.
fn edge_via(a: EntityKind, b: EntityKind) -> EdgeVia {
    if a == EntityKind::Dataflow || b == EntityKind::Dataflow {
        EdgeVia::Dataflow
    } else {
        EdgeVia::Direct
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_response() -> Value {
        json!({
            "DATA_SOURCE9f2c": {
                "type": "DATA_SOURCE",
                "id": "9f2c",
                "name": "Sales",
                "complete": true,
                "parents": [
                    {
                        "type": "DATAFLOW",
                        "id": 42,
                        "name": "Nightly ETL",
                        "parents": [
                            {"type": "DATA_SOURCE", "id": "raw-1", "name": "Raw Sales"}
                        ]
                    }
                ],
                "children": [
                    {"type": "CARD", "id": 7, "name": "Revenue"}
                ]
            }
        })
    }

    #[test]
    fn test_merges_nested_parents_and_children() {
        let graph =
            merge_remote_lineage(&sample_response(), "9f2c", EntityKind::Dataset).unwrap();
        assert_eq!(graph.node_count(), 4);
        assert!(graph.node("42").unwrap().resolved);
        assert_eq!(graph.node("7").unwrap().kind, EntityKind::Card);

        let pairs: Vec<_> = graph
            .edges()
            .iter()
            .map(|e| (e.from_id.as_str(), e.to_id.as_str(), e.via))
            .collect();
        assert!(pairs.contains(&("42", "9f2c", EdgeVia::Dataflow)));
        assert!(pairs.contains(&("raw-1", "42", EdgeVia::Dataflow)));
        assert!(pairs.contains(&("9f2c", "7", EdgeVia::Direct)));
        assert!(graph.is_complete());
    }

    #[test]
    fn test_missing_root_key_is_no_lineage_data() {
        let err = merge_remote_lineage(&sample_response(), "other", EntityKind::Dataset)
            .unwrap_err();
        assert!(matches!(err, LineageError::NoLineageData { key } if key == "DATA_SOURCEother"));
    }

    #[test]
    fn test_non_object_response_is_malformed() {
        let err = merge_remote_lineage(&json!([1, 2]), "x", EntityKind::Dataset).unwrap_err();
        assert!(matches!(err, LineageError::Malformed { .. }));
    }

    #[test]
    fn test_non_array_parents_is_malformed() {
        let response = json!({
            "CARD7": {"type": "CARD", "id": 7, "parents": "nope"}
        });
        let err = merge_remote_lineage(&response, "7", EntityKind::Card).unwrap_err();
        assert!(matches!(err, LineageError::Malformed { path, .. } if path.ends_with(".parents")));
    }

    #[test]
    fn test_repeated_references_collapse() {
        // The same dataflow appears under both children; one node, one edge each.
        let response = json!({
            "DATA_SOURCEd1": {
                "type": "DATA_SOURCE",
                "id": "d1",
                "children": [
                    {"type": "DATAFLOW", "id": "f1", "name": "Sync"},
                    {"type": "DATAFLOW", "id": "f1", "name": "Sync"}
                ]
            }
        });
        let graph = merge_remote_lineage(&response, "d1", EntityKind::Dataset).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edges().len(), 1);
    }

    #[test]
    fn test_unknown_entity_tag_skipped_not_fatal() {
        let response = json!({
            "DATA_SOURCEd1": {
                "type": "DATA_SOURCE",
                "id": "d1",
                "children": [
                    {"type": "PAGE", "id": "p1"},
                    {"type": "CARD", "id": "c1"}
                ]
            }
        });
        let graph = merge_remote_lineage(&response, "d1", EntityKind::Dataset).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert!(graph.contains("c1"));
        assert!(!graph.is_complete());
    }

    #[test]
    fn test_depth_guard_truncates_instead_of_recursing() {
        // Build a chain nested deeper than the budget.
        let mut leaf = json!({"type": "DATA_SOURCE", "id": "leaf"});
        for i in 0..(MAX_NESTING_DEPTH + 4) {
            leaf = json!({"type": "DATAFLOW", "id": format!("f{i}"), "parents": [leaf]});
        }
        let response = json!({
            "DATA_SOURCEroot": {
                "type": "DATA_SOURCE", "id": "root", "parents": [leaf]
            }
        });
        let graph = merge_remote_lineage(&response, "root", EntityKind::Dataset).unwrap();
        assert!(!graph.is_complete());
        assert!(!graph.contains("leaf"));
    }

    #[test]
    fn test_server_reported_incomplete_propagates() {
        let response = json!({
            "CARD7": {"type": "CARD", "id": 7, "complete": false}
        });
        let graph = merge_remote_lineage(&response, "7", EntityKind::Card).unwrap();
        assert!(!graph.is_complete());
    }

    #[test]
    fn test_self_reference_filtered() {
        let response = json!({
            "DATA_SOURCEd1": {
                "type": "DATA_SOURCE",
                "id": "d1",
                "children": [{"type": "DATA_SOURCE", "id": "d1"}]
            }
        });
        let graph = merge_remote_lineage(&response, "d1", EntityKind::Dataset).unwrap();
        assert_eq!(graph.node_count(), 1);
        assert!(graph.edges().is_empty());
    }
}
