//! String key newtypes for graph entities and collision-free key generation.
//!
//! Keys are distinct newtype wrappers over `String`, providing type safety so
//! that a `NodeKey` cannot be accidentally used where an `EdgeKey` is
//! expected. Node keys are minted by [`KeyGenerator`] from the node type and
//! a per-type counter; edge keys are derived deterministically from the edge
//! endpoints, which is what allows edges to be re-identified when an external
//! format carries them without explicit identifiers.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::WorkflowGraph;
use crate::node::NodeType;

/// Node identifier, unique within a single graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(pub String);

/// Edge identifier, unique within a single graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeKey(pub String);

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeKey {
    fn from(s: &str) -> Self {
        NodeKey(s.to_string())
    }
}

impl From<String> for NodeKey {
    fn from(s: String) -> Self {
        NodeKey(s)
    }
}

impl AsRef<str> for NodeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EdgeKey {
    fn from(s: &str) -> Self {
        EdgeKey(s.to_string())
    }
}

impl From<String> for EdgeKey {
    fn from(s: String) -> Self {
        EdgeKey(s)
    }
}

impl AsRef<str> for EdgeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Mints node keys that do not collide with any key live in the target
/// graph.
///
/// One generator is owned per graph instance (by the editor store). Keys are
/// `{type_slug}_{n}` with a per-type counter; the counter is advanced past
/// any key already present in the graph, so a generator created for a loaded
/// graph never re-issues an existing key.
#[derive(Debug, Clone, Default)]
pub struct KeyGenerator {
    counters: HashMap<NodeType, u32>,
}

impl KeyGenerator {
    /// Creates a generator with all counters at zero.
    pub fn new() -> Self {
        KeyGenerator::default()
    }

    /// Returns a fresh node key for `node_type` that is not present in
    /// `graph`.
    pub fn next_node_key(&mut self, node_type: NodeType, graph: &WorkflowGraph) -> NodeKey {
        let counter = self.counters.entry(node_type).or_insert(0);
        loop {
            *counter += 1;
            let candidate = NodeKey(format!("{}_{}", node_type.slug(), counter));
            if !graph.contains_node(&candidate) {
                return candidate;
            }
        }
    }

    /// Derives the deterministic key for an edge between two nodes.
    ///
    /// Duplicate (source, target) pairs are forbidden by the store, so the
    /// derived key cannot collide with another live edge.
    pub fn edge_key(source: &NodeKey, target: &NodeKey) -> EdgeKey {
        EdgeKey(format!("{}->{}", source, target))
    }
}
