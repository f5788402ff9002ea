//! WorkflowGraph: the canonical in-memory graph container.
//!
//! [`WorkflowGraph`] holds the node list (insertion order, not semantically
//! significant), the edge list, and presentation-only viewport state. It
//! offers key-safe structural primitives: insertion with duplicate-key
//! checks, cascading node removal, and atomic node rename (every edge
//! referencing the old key is rewritten and re-keyed in the same call).
//!
//! Rule enforcement (count bounds, cycle prevention, connectivity) lives in
//! `flowgraph-editor`; this container only guarantees referential sanity of
//! the operations it exposes.

use serde::{Deserialize, Serialize};

use crate::edge::WorkflowEdge;
use crate::error::CoreError;
use crate::id::{EdgeKey, KeyGenerator, NodeKey};
use crate::node::{NodeType, Position, WorkflowNode};
use crate::template;

/// Canvas viewport state. Presentation only, never validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub zoom: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// The canonical representation of one workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowGraph {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Nodes in insertion order.
    pub nodes: Vec<WorkflowNode>,
    pub edges: Vec<WorkflowEdge>,
    #[serde(default)]
    pub viewport: Viewport,
}

impl WorkflowGraph {
    /// Creates an empty graph.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        WorkflowGraph {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            viewport: Viewport::default(),
        }
    }

    /// Creates the default template for a fresh workflow: one Start and one
    /// End node, satisfying the minimum counts for both singleton types.
    pub fn default_template(id: impl Into<String>, name: impl Into<String>) -> Self {
        let mut graph = WorkflowGraph::new(id, name);
        let start = template::instantiate(
            NodeType::Start,
            NodeKey::from("start_1"),
            Position::new(120.0, 200.0),
        );
        let end = template::instantiate(
            NodeType::End,
            NodeKey::from("end_1"),
            Position::new(760.0, 200.0),
        );
        graph.nodes.push(start);
        graph.nodes.push(end);
        graph
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    /// Looks up a node by key.
    pub fn node(&self, key: &NodeKey) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| &n.key == key)
    }

    /// Looks up a node by key (mutable).
    pub fn node_mut(&mut self, key: &NodeKey) -> Option<&mut WorkflowNode> {
        self.nodes.iter_mut().find(|n| &n.key == key)
    }

    /// Looks up an edge by key.
    pub fn edge(&self, key: &EdgeKey) -> Option<&WorkflowEdge> {
        self.edges.iter().find(|e| &e.key == key)
    }

    /// Returns `true` if a node with `key` exists.
    pub fn contains_node(&self, key: &NodeKey) -> bool {
        self.node(key).is_some()
    }

    /// Returns `true` if an edge with the given (source, target) pair exists.
    pub fn has_pair(&self, source: &NodeKey, target: &NodeKey) -> bool {
        self.edges
            .iter()
            .any(|e| &e.source == source && &e.target == target)
    }

    /// Number of live nodes of `node_type`.
    pub fn count_of_type(&self, node_type: NodeType) -> usize {
        self.nodes.iter().filter(|n| n.node_type == node_type).count()
    }

    /// Edges whose target is `key`.
    pub fn incoming<'a>(&'a self, key: &'a NodeKey) -> impl Iterator<Item = &'a WorkflowEdge> {
        self.edges.iter().filter(move |e| &e.target == key)
    }

    /// Edges whose source is `key`.
    pub fn outgoing<'a>(&'a self, key: &'a NodeKey) -> impl Iterator<Item = &'a WorkflowEdge> {
        self.edges.iter().filter(move |e| &e.source == key)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // -----------------------------------------------------------------------
    // Structural primitives
    // -----------------------------------------------------------------------

    /// Appends a node, rejecting a duplicate key.
    pub fn push_node(&mut self, node: WorkflowNode) -> Result<(), CoreError> {
        if self.contains_node(&node.key) {
            return Err(CoreError::DuplicateNodeKey { key: node.key });
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Appends an edge, rejecting a duplicate key.
    ///
    /// Pair/self-loop/cycle rules are the editor store's concern.
    pub fn push_edge(&mut self, edge: WorkflowEdge) -> Result<(), CoreError> {
        if self.edge(&edge.key).is_some() {
            return Err(CoreError::DuplicateEdgeKey { key: edge.key });
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Removes a node and every edge touching it.
    ///
    /// Returns the removed node and the number of cascaded edges.
    pub fn remove_node(&mut self, key: &NodeKey) -> Result<(WorkflowNode, usize), CoreError> {
        let idx = self
            .nodes
            .iter()
            .position(|n| &n.key == key)
            .ok_or_else(|| CoreError::NodeNotFound { key: key.clone() })?;
        let node = self.nodes.remove(idx);
        let before = self.edges.len();
        self.edges.retain(|e| !e.touches(key));
        Ok((node, before - self.edges.len()))
    }

    /// Removes an edge by key.
    pub fn remove_edge(&mut self, key: &EdgeKey) -> Result<WorkflowEdge, CoreError> {
        let idx = self
            .edges
            .iter()
            .position(|e| &e.key == key)
            .ok_or_else(|| CoreError::EdgeNotFound { key: key.clone() })?;
        Ok(self.edges.remove(idx))
    }

    /// Atomically re-keys a node and rewrites every edge endpoint that
    /// referenced the old key.
    ///
    /// Edge keys are derived from their endpoints, so rewritten edges are
    /// re-keyed in the same pass. No edge is ever left dangling.
    pub fn rename_node(&mut self, old: &NodeKey, new: NodeKey) -> Result<(), CoreError> {
        if old == &new {
            return Ok(());
        }
        if self.contains_node(&new) {
            return Err(CoreError::DuplicateNodeKey { key: new });
        }
        let node = self
            .node_mut(old)
            .ok_or_else(|| CoreError::NodeNotFound { key: old.clone() })?;
        node.key = new.clone();

        for edge in &mut self.edges {
            let mut rewritten = false;
            if &edge.source == old {
                edge.source = new.clone();
                rewritten = true;
            }
            if &edge.target == old {
                edge.target = new.clone();
                rewritten = true;
            }
            if rewritten {
                edge.key = KeyGenerator::edge_key(&edge.source, &edge.target);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(key: &str, ty: NodeType) -> WorkflowNode {
        template::instantiate(ty, NodeKey::from(key), Position::default())
    }

    fn three_node_graph() -> WorkflowGraph {
        let mut g = WorkflowGraph::new("wf", "test");
        g.push_node(node("s1", NodeType::Start)).unwrap();
        g.push_node(node("c1", NodeType::Condition)).unwrap();
        g.push_node(node("e1", NodeType::End)).unwrap();
        g.push_edge(WorkflowEdge::between("s1".into(), "c1".into()))
            .unwrap();
        g.push_edge(WorkflowEdge::between("c1".into(), "e1".into()))
            .unwrap();
        g
    }

    #[test]
    fn default_template_seeds_start_and_end() {
        let g = WorkflowGraph::default_template("wf", "fresh");
        assert_eq!(g.count_of_type(NodeType::Start), 1);
        assert_eq!(g.count_of_type(NodeType::End), 1);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn push_node_rejects_duplicate_key() {
        let mut g = WorkflowGraph::new("wf", "t");
        g.push_node(node("a", NodeType::Start)).unwrap();
        let err = g.push_node(node("a", NodeType::End)).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateNodeKey { .. }));
    }

    #[test]
    fn remove_node_cascades_incident_edges() {
        let mut g = three_node_graph();
        let (removed, cascaded) = g.remove_node(&"c1".into()).unwrap();
        assert_eq!(removed.key.0, "c1");
        assert_eq!(cascaded, 2);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn rename_rewrites_and_rekeys_edges() {
        let mut g = three_node_graph();
        g.rename_node(&"c1".into(), "branch_main".into()).unwrap();

        assert!(g.contains_node(&"branch_main".into()));
        assert!(!g.contains_node(&"c1".into()));
        for edge in &g.edges {
            assert_ne!(edge.source.0, "c1");
            assert_ne!(edge.target.0, "c1");
            assert_eq!(
                edge.key,
                KeyGenerator::edge_key(&edge.source, &edge.target)
            );
        }
        assert!(g.has_pair(&"s1".into(), &"branch_main".into()));
        assert!(g.has_pair(&"branch_main".into(), &"e1".into()));
    }

    #[test]
    fn rename_to_occupied_key_is_rejected() {
        let mut g = three_node_graph();
        let err = g.rename_node(&"c1".into(), "e1".into()).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateNodeKey { .. }));
        // Unchanged on failure.
        assert!(g.contains_node(&"c1".into()));
    }

    #[test]
    fn incoming_and_outgoing() {
        let g = three_node_graph();
        let c1 = NodeKey::from("c1");
        assert_eq!(g.incoming(&c1).count(), 1);
        assert_eq!(g.outgoing(&c1).count(), 1);
        let s1 = NodeKey::from("s1");
        assert_eq!(g.incoming(&s1).count(), 0);
        assert_eq!(g.outgoing(&s1).count(), 1);
    }

    #[test]
    fn serde_roundtrip_preserves_node_order() {
        let g = three_node_graph();
        let json = serde_json::to_string(&g).unwrap();
        let back: WorkflowGraph = serde_json::from_str(&json).unwrap();
        let keys: Vec<_> = back.nodes.iter().map(|n| n.key.0.as_str()).collect();
        assert_eq!(keys, vec!["s1", "c1", "e1"]);
        assert_eq!(back, g);
    }
}
