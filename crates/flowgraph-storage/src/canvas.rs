//! The editor-canvas shape of a workflow.
//!
//! The canvas groups edges as a property of their source node rather than a
//! flat top-level list. After a canonical-to-canvas conversion the top-level
//! edge list is always empty; the canvas-to-canonical direction reads the
//! per-node attachments first and then merges in any top-level edges that
//! are not already present, to stay tolerant of partially-populated
//! external data.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use flowgraph_core::{FieldDescriptor, NodeKey, NodeType, Position, Viewport};

/// The canvas representation of a whole graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CanvasGraph {
    #[serde(default)]
    pub nodes: Vec<CanvasNode>,
    /// Normally empty; tolerated on input for partially-populated data.
    #[serde(default)]
    pub edges: Vec<CanvasEdge>,
    #[serde(default)]
    pub viewport: Viewport,
}

/// One node on the canvas, carrying its outgoing edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasNode {
    pub id: NodeKey,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub meta: CanvasMeta,
    pub data: CanvasData,
    #[serde(default)]
    pub edges: Vec<AttachedEdge>,
}

/// Canvas placement metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CanvasMeta {
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub default_expanded: bool,
}

/// The node's editable content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CanvasData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub input_fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub output_fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub settings: IndexMap<String, Value>,
}

/// An edge attached to its source node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachedEdge {
    #[serde(rename = "targetNodeID")]
    pub target_node_id: NodeKey,
    #[serde(default)]
    pub data: EdgeData,
}

/// A top-level edge (tolerated on input only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasEdge {
    #[serde(rename = "sourceNodeID")]
    pub source_node_id: NodeKey,
    #[serde(rename = "targetNodeID")]
    pub target_node_id: NodeKey,
    #[serde(default)]
    pub data: EdgeData,
}

/// Optional edge payload shared by attached and top-level edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canvas_node_uses_external_key_names() {
        let node: CanvasNode = serde_json::from_value(json!({
            "id": "chat_1",
            "type": "ai-chat",
            "meta": {"position": {"x": 100.0, "y": 200.0}, "defaultExpanded": true},
            "data": {"title": "AI Chat", "content": ""},
            "edges": [{"targetNodeID": "end_1", "data": {}}]
        }))
        .unwrap();

        assert_eq!(node.node_type, NodeType::AiChat);
        assert!(node.meta.default_expanded);
        assert_eq!(node.edges[0].target_node_id, NodeKey::from("end_1"));
    }

    #[test]
    fn missing_edges_list_defaults_to_empty() {
        let graph: CanvasGraph = serde_json::from_value(json!({"nodes": []})).unwrap();
        assert!(graph.edges.is_empty());
        assert_eq!(graph.viewport, Viewport::default());
    }
}
