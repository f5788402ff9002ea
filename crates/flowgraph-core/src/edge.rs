//! Directed connections between workflow nodes.

use serde::{Deserialize, Serialize};

use crate::id::{EdgeKey, KeyGenerator, NodeKey};

/// A directed connection between two nodes.
///
/// Edges may carry optional port labels (which output of the source feeds
/// which input of the target) and an optional condition expression with a
/// display label. Structural invariants (no self-loops, no duplicate
/// source/target pairs, no cycles) are enforced by the editor store, not
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowEdge {
    pub key: EdgeKey,
    pub source: NodeKey,
    pub target: NodeKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl WorkflowEdge {
    /// Creates a plain edge between two nodes with the deterministic key for
    /// that pair.
    pub fn between(source: NodeKey, target: NodeKey) -> Self {
        let key = KeyGenerator::edge_key(&source, &target);
        WorkflowEdge {
            key,
            source,
            target,
            source_port: None,
            target_port: None,
            condition: None,
            label: None,
        }
    }

    /// Returns `true` if either endpoint is `key`.
    pub fn touches(&self, key: &NodeKey) -> bool {
        &self.source == key || &self.target == key
    }
}
