// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::EdgeId;

/// Error conditions which may occur when building, loading or querying a [Graph](crate::Graph).
///
/// Build errors ([Error::MissingNode], [Error::DuplicateNode], [Error::InvalidLength],
/// [Error::EmptyGraph]) abort the whole build; no partial graph is ever returned.
/// Query errors ([Error::UnknownNode]) never modify the graph.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An edge references a node which is not present in the node records.
    #[error("edge {edge} references missing node: {node}")]
    MissingNode { edge: EdgeId, node: String },

    /// Two node records share the same id.
    #[error("duplicate node: {0}")]
    DuplicateNode(String),

    /// An edge has a negative or non-finite length.
    #[error("edge {edge} has invalid length: {length}")]
    InvalidLength { edge: EdgeId, length: f64 },

    /// The graph has no nodes.
    #[error("graph has no nodes")]
    EmptyGraph,

    /// A query references a node which doesn't exist in the graph.
    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid interchange document: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "sqlite")]
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
