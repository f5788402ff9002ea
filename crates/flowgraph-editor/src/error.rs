//! Operation rejections: expected rule violations, returned as values.
//!
//! Every mutating store operation that can fail due to a constraint
//! returns one of these instead of raising. The messages double as the
//! human-readable reasons exposed through `Permission::Denied`.

use std::fmt;

use flowgraph_core::{EdgeKey, NodeKey, NodeType};

/// Why a store operation was rejected.
// Display and Error are implemented by hand: thiserror's derive treats any
// field named `source` as the error source, but here `source` is an edge
// endpoint, not a wrapped error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The type's maximum live instance count is already reached.
    MaxCountReached { node_type: NodeType, max: u32 },

    /// The type forbids deletion entirely.
    NotDeletable { node_type: NodeType },

    /// Deletion would drop the type below its minimum live count.
    MinCountReached { node_type: NodeType, min: u32 },

    /// The type forbids copying.
    NotCopyable { node_type: NodeType },

    NodeNotFound { key: NodeKey },

    EdgeNotFound { key: EdgeKey },

    /// An edge may not connect a node to itself.
    SelfLoop { key: NodeKey },

    /// A connection between this (source, target) pair already exists.
    DuplicateEdge { source: NodeKey, target: NodeKey },

    /// Adding the edge would introduce a directed cycle.
    WouldCycle { source: NodeKey, target: NodeKey },

    /// Renaming a node to a key that is already taken.
    KeyTaken { key: NodeKey },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxCountReached { node_type, max } => write!(
                f,
                "cannot add another {} node: at most {max} allowed",
                node_type.display_name()
            ),
            Self::NotDeletable { node_type } => {
                write!(f, "{} nodes cannot be deleted", node_type.display_name())
            }
            Self::MinCountReached { node_type, min } => write!(
                f,
                "cannot delete the last {} node: at least {min} required",
                node_type.display_name()
            ),
            Self::NotCopyable { node_type } => {
                write!(f, "{} nodes cannot be copied", node_type.display_name())
            }
            Self::NodeNotFound { key } => write!(f, "node not found: '{key}'"),
            Self::EdgeNotFound { key } => write!(f, "edge not found: '{key}'"),
            Self::SelfLoop { key } => write!(f, "cannot connect node '{key}' to itself"),
            Self::DuplicateEdge { source, target } => write!(
                f,
                "connection from '{source}' to '{target}' already exists"
            ),
            Self::WouldCycle { source, target } => write!(
                f,
                "connecting '{source}' to '{target}' would create a cycle"
            ),
            Self::KeyTaken { key } => write!(f, "node key '{key}' is already in use"),
        }
    }
}

impl std::error::Error for StoreError {}
