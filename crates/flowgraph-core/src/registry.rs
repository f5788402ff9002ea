//! Static per-type cardinality and structural rules.
//!
//! One [`NodeConstraints`] record exists for every [`NodeType`]. The table is
//! a pure lookup: an exhaustive `match`, so there is no miss case. The editor
//! store consults these records before every mutation; the validator uses
//! the connectivity flags for disconnected-node findings.

use serde::{Deserialize, Serialize};

use crate::node::NodeType;

/// Cardinality and structural rules for one node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConstraints {
    /// Minimum live instance count. Deletion below this is rejected.
    pub min_count: u32,
    /// Maximum live instance count; `None` means unbounded.
    pub max_count: Option<u32>,
    /// Whether instances may be deleted at all.
    pub deletable: bool,
    /// Whether instances may be duplicated via node copy.
    pub copyable: bool,
    /// Whether an instance must have at least one incoming edge to be
    /// considered connected.
    pub requires_incoming: bool,
    /// Whether an instance must have at least one outgoing edge to be
    /// considered connected.
    pub requires_outgoing: bool,
}

const START: NodeConstraints = NodeConstraints {
    min_count: 1,
    max_count: Some(1),
    deletable: false,
    copyable: false,
    requires_incoming: false,
    requires_outgoing: true,
};

const END: NodeConstraints = NodeConstraints {
    min_count: 1,
    max_count: Some(1),
    deletable: false,
    copyable: false,
    requires_incoming: true,
    requires_outgoing: false,
};

const INTERIOR: NodeConstraints = NodeConstraints {
    min_count: 0,
    max_count: None,
    deletable: true,
    copyable: true,
    requires_incoming: true,
    requires_outgoing: true,
};

impl NodeType {
    /// Looks up the constraint record for this type.
    pub const fn constraints(self) -> NodeConstraints {
        match self {
            NodeType::Start => START,
            NodeType::End => END,
            NodeType::Condition
            | NodeType::Fork
            | NodeType::ForEach
            | NodeType::AiChat
            | NodeType::DataProcess
            | NodeType::ScriptCode
            | NodeType::PluginCall
            | NodeType::KnowledgeLookup => INTERIOR,
        }
    }
}
