//! Raw record shapes returned by the vendor metadata endpoints.
//!
//! The platform has shipped three wire shapes for dataflows over its API
//! lifetime (the original v1 records, the v2 records, and the "merged" list
//! shape that carries fields from both). [`RawDataflow`] models them as one
//! typed union so shape detection happens exactly once, at deserialization;
//! downstream code only ever sees the normalized accessors.

use serde::{Deserialize, Serialize};

/// A dataset input or output reference inside a v1 dataflow record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DataflowIo {
    /// GUID of the referenced dataset.
    pub data_source_id: String,
    /// Display name when the endpoint hydrated it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source_name: Option<String>,
}

/// Original dataflow record: hydrated `inputs` / `outputs` arrays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawDataflowV1 {
    pub id: String,
    pub name: String,
    pub inputs: Vec<DataflowIo>,
    pub outputs: Vec<DataflowIo>,
}

/// v2 dataflow record: bare id lists, no hydrated names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawDataflowV2 {
    pub id: String,
    pub name: String,
    pub input_dataset_ids: Vec<String>,
    pub output_dataset_ids: Vec<String>,
}

/// Merged list-endpoint record: carries v1-style io arrays when the endpoint
/// hydrated them, otherwise only counts. `version_count` is the marker field
/// that distinguishes this shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MergedDataflow {
    pub id: String,
    pub name: String,
    pub version_count: u64,
    #[serde(default)]
    pub inputs: Vec<DataflowIo>,
    #[serde(default)]
    pub outputs: Vec<DataflowIo>,
}

/// The typed union over the three dataflow wire shapes.
///
/// Deserialization tries the most constrained shapes first; `Merged` is
/// gated on its `versionCount` marker so partially-hydrated list records
/// cannot be mistaken for v1 records with empty io arrays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RawDataflow {
    Merged(MergedDataflow),
    V1(RawDataflowV1),
    V2(RawDataflowV2),
}

impl RawDataflow {
    pub fn id(&self) -> &str {
        match self {
            Self::Merged(d) => &d.id,
            Self::V1(d) => &d.id,
            Self::V2(d) => &d.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Merged(d) => &d.name,
            Self::V1(d) => &d.name,
            Self::V2(d) => &d.name,
        }
    }

    /// Dataset ids this dataflow reads from.
    pub fn input_ids(&self) -> Vec<String> {
        match self {
            Self::Merged(d) => d.inputs.iter().map(|io| io.data_source_id.clone()).collect(),
            Self::V1(d) => d.inputs.iter().map(|io| io.data_source_id.clone()).collect(),
            Self::V2(d) => d.input_dataset_ids.clone(),
        }
    }

    /// Dataset ids this dataflow writes to.
    pub fn output_ids(&self) -> Vec<String> {
        match self {
            Self::Merged(d) => d.outputs.iter().map(|io| io.data_source_id.clone()).collect(),
            Self::V1(d) => d.outputs.iter().map(|io| io.data_source_id.clone()).collect(),
            Self::V2(d) => d.output_dataset_ids.clone(),
        }
    }
}

/// Dataset record as returned by the metadata endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawDataset {
    pub id: String,
    pub name: String,
    /// Dataflows that write this dataset.
    #[serde(default)]
    pub producer_dataflow_ids: Vec<String>,
    /// Dataflows that read this dataset.
    #[serde(default)]
    pub consumer_dataflow_ids: Vec<String>,
    /// Cards rendered directly from this dataset.
    #[serde(default)]
    pub card_ids: Vec<String>,
}

/// Card record. Cards carry a `title` on the wire rather than a `name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawCard {
    pub id: String,
    pub title: String,
    /// Datasets this card visualizes.
    #[serde(default)]
    pub dataset_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataflow_v1_shape() {
        let json = r#"{
            "id": "18",
            "name": "Nightly ETL",
            "inputs": [{"dataSourceId": "aa-1", "dataSourceName": "Raw Sales"}],
            "outputs": [{"dataSourceId": "bb-2"}]
        }"#;
        let df: RawDataflow = serde_json::from_str(json).unwrap();
        assert!(matches!(df, RawDataflow::V1(_)));
        assert_eq!(df.input_ids(), vec!["aa-1"]);
        assert_eq!(df.output_ids(), vec!["bb-2"]);
        assert_eq!(df.name(), "Nightly ETL");
    }

    #[test]
    fn test_dataflow_v2_shape() {
        let json = r#"{
            "id": "19",
            "name": "Hourly Sync",
            "inputDatasetIds": ["aa-1", "aa-2"],
            "outputDatasetIds": ["cc-3"]
        }"#;
        let df: RawDataflow = serde_json::from_str(json).unwrap();
        assert!(matches!(df, RawDataflow::V2(_)));
        assert_eq!(df.input_ids(), vec!["aa-1", "aa-2"]);
    }

    #[test]
    fn test_dataflow_merged_shape_takes_priority() {
        // Has v1-style arrays AND the versionCount marker: must decode as Merged.
        let json = r#"{
            "id": "20",
            "name": "Backfill",
            "versionCount": 7,
            "inputs": [{"dataSourceId": "aa-1"}],
            "outputs": []
        }"#;
        let df: RawDataflow = serde_json::from_str(json).unwrap();
        assert!(matches!(df, RawDataflow::Merged(_)));
        assert_eq!(df.input_ids(), vec!["aa-1"]);
        assert!(df.output_ids().is_empty());
    }

    #[test]
    fn test_dataflow_merged_without_io_arrays() {
        let json = r#"{"id": "21", "name": "Sparse", "versionCount": 1}"#;
        let df: RawDataflow = serde_json::from_str(json).unwrap();
        assert!(matches!(df, RawDataflow::Merged(_)));
        assert!(df.input_ids().is_empty());
    }

    #[test]
    fn test_dataset_defaults() {
        let json = r#"{"id": "aa-1", "name": "Sales"}"#;
        let ds: RawDataset = serde_json::from_str(json).unwrap();
        assert!(ds.producer_dataflow_ids.is_empty());
        assert!(ds.consumer_dataflow_ids.is_empty());
        assert!(ds.card_ids.is_empty());
    }

    #[test]
    fn test_card_title_field() {
        let json = r#"{"id": "77", "title": "Revenue by Region", "datasetIds": ["aa-1"]}"#;
        let card: RawCard = serde_json::from_str(json).unwrap();
        assert_eq!(card.title, "Revenue by Region");
        assert_eq!(card.dataset_ids, vec!["aa-1"]);
    }
}
