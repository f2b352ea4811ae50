//! Integration tests for the snapshot-backed store feeding the core engine.

use lineascope_cli::snapshot::SnapshotStore;
use lineascope_core::{
    compute_traversal, render, BuildOptions, EntityKind, GraphBuilder, LineageError, RenderFormat,
};
use std::io::Write;

const SNAPSHOT_JSON: &str = r#"{
    "generatedAt": "2026-08-01T12:00:00Z",
    "datasets": [
        {
            "id": "sales-guid",
            "name": "Sales",
            "producerDataflowIds": ["18"],
            "consumerDataflowIds": [],
            "cardIds": ["700"]
        },
        {
            "id": "raw-guid",
            "name": "Raw Sales",
            "consumerDataflowIds": ["18"]
        }
    ],
    "dataflows": [
        {
            "id": "18",
            "name": "Nightly ETL",
            "inputs": [{"dataSourceId": "raw-guid", "dataSourceName": "Raw Sales"}],
            "outputs": [{"dataSourceId": "sales-guid"}]
        }
    ],
    "cards": [
        {"id": "700", "title": "Revenue by Region", "datasetIds": ["sales-guid"]}
    ],
    "unavailable": ["blocked-guid"]
}"#;

fn write_snapshot() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(SNAPSHOT_JSON.as_bytes()).expect("write snapshot");
    file
}

fn opts() -> BuildOptions {
    BuildOptions {
        traverse_up: true,
        traverse_down: true,
        max_depth: 8,
        max_nodes: 500,
    }
}

#[tokio::test]
async fn snapshot_file_feeds_full_pipeline() {
    let file = write_snapshot();
    let store = SnapshotStore::load(file.path()).unwrap();
    assert!(store.generated_at().is_some());

    let graph = GraphBuilder::new(&store)
        .build("sales-guid", EntityKind::Dataset, opts())
        .await
        .unwrap();
    let result = compute_traversal(&graph);

    assert!(result.ancestors.contains("18"));
    assert!(result.ancestors.contains("raw-guid"));
    assert_eq!(result.descendants.iter().collect::<Vec<_>>(), vec!["700"]);
    assert!(result.complete);

    let text = render(&graph, &result, RenderFormat::Text);
    assert!(text.contains("dataflow (18) [Nightly ETL]"));
    assert!(text.contains("card (700) [Revenue by Region]"));
}

#[tokio::test]
async fn unknown_root_is_not_found() {
    let file = write_snapshot();
    let store = SnapshotStore::load(file.path()).unwrap();
    let err = GraphBuilder::new(&store)
        .build("ghost", EntityKind::Dataset, opts())
        .await
        .unwrap_err();
    assert!(matches!(err, LineageError::NotFound { .. }));
}

#[tokio::test]
async fn unavailable_entry_degrades_build() {
    let json = r#"{
        "datasets": [
            {"id": "d1", "name": "Sales", "producerDataflowIds": ["99"]}
        ],
        "unavailable": ["99"]
    }"#;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let store = SnapshotStore::load(file.path()).unwrap();
    let graph = GraphBuilder::new(&store)
        .build("d1", EntityKind::Dataset, opts())
        .await
        .unwrap();

    assert!(!graph.node("99").unwrap().resolved);
    assert!(!graph.is_complete());
}

#[test]
fn malformed_snapshot_is_a_load_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"not json").unwrap();
    assert!(SnapshotStore::load(file.path()).is_err());
}
