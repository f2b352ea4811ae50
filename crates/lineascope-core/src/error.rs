//! Error types for lineage graph construction.
//!
//! # Error Handling Strategy
//!
//! This crate uses two complementary error handling patterns:
//!
//! - [`LineageError`]: Fatal errors that prevent a graph from being built at
//!   all. Returned as `Result<T, LineageError>` and surfaced to the caller
//!   unchanged (for example, the requested root entity does not exist).
//!
//! - Degraded nodes: non-fatal fetch failures encountered *during* a build
//!   leave the affected node in the graph with `resolved = false` and flip
//!   the graph's `complete` flag. Traversal and rendering proceed over
//!   whatever subgraph was gathered.
//!
//! This separation keeps the builder resilient: partial lineage is always
//! preferable to a hard failure, so only conditions that make the whole
//! invocation meaningless (missing root, structurally malformed payloads)
//! are allowed to escape as errors.

use crate::types::EntityKind;
use thiserror::Error;

/// Error encountered while building or merging a lineage graph.
#[derive(Debug, Error)]
pub enum LineageError {
    /// The requested root entity does not exist in any backing store.
    ///
    /// Not retried; the caller should report "no such dataset/dataflow".
    #[error("no {kind} found with id '{id}'")]
    NotFound {
        /// Entity type that was requested.
        kind: EntityKind,
        /// Identifier that could not be resolved.
        id: String,
    },

    /// A fetch failed due to network, auth, or configuration problems and no
    /// cached record was available.
    ///
    /// The graph builder recovers from this for non-root nodes by marking
    /// them unresolved; it only escapes when the root itself is unreachable.
    #[error("upstream unavailable while resolving {kind} '{id}': {reason}")]
    UpstreamUnavailable {
        kind: EntityKind,
        id: String,
        /// Human-readable cause from the underlying store.
        reason: String,
    },

    /// The remote lineage response lacked the expected top-level entity key.
    ///
    /// Fatal for the command invocation that requested it.
    #[error("remote lineage response has no entry for '{key}'")]
    NoLineageData {
        /// The `"<KIND><id>"` key that was expected.
        key: String,
    },

    /// Structurally malformed remote data: a non-object or non-array where
    /// the vendor schema requires one.
    ///
    /// Excess nesting depth is *not* reported through this variant; the
    /// merger degrades that to truncation instead.
    #[error("malformed lineage payload at {path}: {detail}")]
    Malformed {
        /// JSON-pointer-ish location of the offending value.
        path: String,
        detail: String,
    },
}

impl LineageError {
    /// Creates a `NotFound` error.
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Creates an `UpstreamUnavailable` error.
    pub fn unavailable(
        kind: EntityKind,
        id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UpstreamUnavailable {
            kind,
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `Malformed` error for a structural violation at `path`.
    pub fn malformed(path: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// True when the builder may degrade this error to an unresolved node
    /// instead of aborting the build.
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            Self::UpstreamUnavailable { .. } | Self::NotFound { .. }
        )
    }
}
