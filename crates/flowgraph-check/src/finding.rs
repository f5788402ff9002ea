//! Validation findings: structured reports of violated invariants.
//!
//! Findings are values, never errors. Callers must not assume any severity
//! ordering beyond "any finding present implies the graph is not runnable".

use serde::{Deserialize, Serialize};

use flowgraph_core::{EdgeKey, NodeKey};

/// The closed set of finding tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    MissingStartNode,
    MissingEndNode,
    DuplicateStartNode,
    DuplicateEndNode,
    /// A node is missing a required incoming or outgoing edge.
    DisconnectedNode,
    CyclicDependency,
    /// An edge is structurally broken: dangling endpoint, self-loop, or
    /// duplicate (source, target) pair.
    InvalidConnection,
    MissingRequiredField,
    InvalidFieldType,
}

/// One validation finding with a human-readable message and the offending
/// entity, when there is one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge: Option<EdgeKey>,
}

impl Finding {
    /// A graph-level finding with no offending entity.
    pub fn graph(kind: FindingKind, message: impl Into<String>) -> Self {
        Finding {
            kind,
            message: message.into(),
            node: None,
            edge: None,
        }
    }

    /// A finding attached to a node.
    pub fn node(kind: FindingKind, message: impl Into<String>, node: NodeKey) -> Self {
        Finding {
            kind,
            message: message.into(),
            node: Some(node),
            edge: None,
        }
    }

    /// A finding attached to an edge.
    pub fn edge(kind: FindingKind, message: impl Into<String>, edge: EdgeKey) -> Self {
        Finding {
            kind,
            message: message.into(),
            node: None,
            edge: Some(edge),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_as_kebab_case() {
        let json = serde_json::to_string(&FindingKind::CyclicDependency).unwrap();
        assert_eq!(json, "\"cyclic-dependency\"");
        let json = serde_json::to_string(&FindingKind::MissingRequiredField).unwrap();
        assert_eq!(json, "\"missing-required-field\"");
    }

    #[test]
    fn constructors_attach_the_right_entity() {
        let f = Finding::node(
            FindingKind::DisconnectedNode,
            "no incoming edge",
            NodeKey::from("end_1"),
        );
        assert_eq!(f.node, Some(NodeKey::from("end_1")));
        assert_eq!(f.edge, None);

        let f = Finding::edge(
            FindingKind::InvalidConnection,
            "self loop",
            EdgeKey::from("a->a"),
        );
        assert_eq!(f.edge, Some(EdgeKey::from("a->a")));
        assert_eq!(f.node, None);
    }
}
