//! Entity kinds and the platform's `"<KIND><id>"` key scheme.
//!
//! The vendor API addresses entities in lineage payloads by concatenating an
//! upper-case kind tag with the raw id (`DATA_SOURCE<guid>`, `DATAFLOW<n>`,
//! `CARD<n>`, `ALERT<n>`). All key construction and parsing goes through
//! [`EntityKey`] so the format lives in exactly one place.

use crate::error::LineageError;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// The type of a lineage entity. Drives traversal direction rules.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A named tabular data resource.
    Dataset,
    /// A transformation job with input and output datasets.
    Dataflow,
    /// A visualization bound to one or more datasets.
    Card,
    /// A notification rule attached to a dataset or card.
    Alert,
}

impl EntityKind {
    /// The upper-case tag the vendor uses in lineage keys.
    pub fn key_tag(&self) -> &'static str {
        match self {
            Self::Dataset => "DATA_SOURCE",
            Self::Dataflow => "DATAFLOW",
            Self::Card => "CARD",
            Self::Alert => "ALERT",
        }
    }

    /// Inverse of [`EntityKind::key_tag`]. `None` for tags this version
    /// does not model (the vendor grows new entity types over time).
    pub fn from_key_tag(tag: &str) -> Option<Self> {
        match tag {
            "DATA_SOURCE" => Some(Self::Dataset),
            "DATAFLOW" => Some(Self::Dataflow),
            "CARD" => Some(Self::Card),
            "ALERT" => Some(Self::Alert),
            _ => None,
        }
    }

    /// All kinds, in the order used for count reporting.
    pub fn all() -> [EntityKind; 4] {
        [Self::Dataset, Self::Dataflow, Self::Card, Self::Alert]
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dataset => "dataset",
            Self::Dataflow => "dataflow",
            Self::Card => "card",
            Self::Alert => "alert",
        };
        write!(f, "{name}")
    }
}

/// A parsed `"<KIND><id>"` entity key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey {
    pub kind: EntityKind,
    pub id: String,
}

impl EntityKey {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// Parses a vendor lineage key like `DATA_SOURCE9f2c-...` or `DATAFLOW42`.
    ///
    /// The tag match is longest-prefix, so `DATA_SOURCE` is tried before any
    /// shorter tag could shadow it. Returns `Malformed` when no known tag
    /// prefixes the key or the id portion is empty.
    pub fn parse(raw: &str) -> Result<Self, LineageError> {
        static KEY_REGEX: OnceLock<Regex> = OnceLock::new();
        let re = KEY_REGEX.get_or_init(|| {
            Regex::new(r"^(DATA_SOURCE|DATAFLOW|CARD|ALERT)(.+)$").expect("Invalid key pattern")
        });

        let caps = re
            .captures(raw)
            .ok_or_else(|| LineageError::malformed(raw, "not a recognized entity key"))?;

        let kind = match caps.get(1).map(|m| m.as_str()) {
            Some("DATA_SOURCE") => EntityKind::Dataset,
            Some("DATAFLOW") => EntityKind::Dataflow,
            Some("CARD") => EntityKind::Card,
            Some("ALERT") => EntityKind::Alert,
            _ => unreachable!("regex alternatives are exhaustive"),
        };

        Ok(Self {
            kind,
            id: caps[2].to_string(),
        })
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.key_tag(), self.id)
    }
}

/// Builds the vendor key string for a kind/id pair.
pub fn make_entity_key(kind: EntityKind, id: &str) -> String {
    format!("{}{id}", kind.key_tag())
}
