//! Core error types for flowgraph-core.
//!
//! Uses `thiserror` for structured, matchable error variants. These cover
//! key-level failures in the raw graph container; rule-level rejections
//! (count bounds, cycles, and so on) are the editor store's concern.

use thiserror::Error;

use crate::id::{EdgeKey, NodeKey};

/// Errors produced by the flowgraph-core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A node key was not found in the graph.
    #[error("node not found: '{key}'")]
    NodeNotFound { key: NodeKey },

    /// An edge key was not found in the graph.
    #[error("edge not found: '{key}'")]
    EdgeNotFound { key: EdgeKey },

    /// Inserting a node whose key is already present.
    #[error("duplicate node key: '{key}'")]
    DuplicateNodeKey { key: NodeKey },

    /// Inserting an edge whose key is already present.
    #[error("duplicate edge key: '{key}'")]
    DuplicateEdgeKey { key: EdgeKey },
}
