//! The persisted wire shape of a workflow.
//!
//! A [`WorkflowConfig`] carries a published design, a draft design (the
//! draft wins wherever both exist), and a presentation side payload
//! (`uiDesign`/`uiDesignDraft`). Historically-string-encoded sub-payloads
//! are modeled as [`RawPayload`] and decoded through typed functions that
//! return a real `Result`; the adapters log and report decode failures
//! instead of silently defaulting.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use flowgraph_core::{FieldDescriptor, NodeKey, NodeType, Position, Viewport};

use crate::error::StorageError;

/// A sub-payload that may arrive either as an embedded object or as a
/// JSON-encoded string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPayload {
    Text(String),
    Value(Value),
}

impl RawPayload {
    /// Decodes the payload into `T`, whichever encoding it arrived in.
    pub fn decode<T: DeserializeOwned>(&self, context: &'static str) -> Result<T, StorageError> {
        let result = match self {
            RawPayload::Text(text) => serde_json::from_str(text),
            RawPayload::Value(value) => serde_json::from_value(value.clone()),
        };
        result.map_err(|source| StorageError::Decode { context, source })
    }

    /// Wraps a serializable value as an embedded-object payload.
    pub fn embed<T: Serialize>(value: &T) -> Result<RawPayload, serde_json::Error> {
        Ok(RawPayload::Value(serde_json::to_value(value)?))
    }
}

/// The persisted shape of one workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowConfig {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Published node designs. May be string-encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_design: Option<RawPayload>,
    /// Draft node designs; preferred over the published list when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_design_draft: Option<Vec<NodeDesign>>,
    /// Published presentation payload. May be string-encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_design: Option<RawPayload>,
    /// Draft presentation payload; preferred over the published one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_design_draft: Option<RawPayload>,
    #[serde(default)]
    pub is_publish: bool,
}

/// One node in the wire design list.
///
/// `next_node_keys` is the fallback edge source: when no presentation
/// payload carries an explicit edge list, the edge set is reconstructed
/// from these per-node neighbor lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDesign {
    pub node_key: NodeKey,
    pub node_type: NodeType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub input_fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub output_fields: Vec<FieldDescriptor>,
    /// Opaque settings map.
    #[serde(default)]
    pub field_designs: IndexMap<String, Value>,
    #[serde(default)]
    pub next_node_keys: Vec<NodeKey>,
}

/// The presentation side payload: per-node canvas state, an explicit edge
/// list (authoritative over `next_node_keys` when present), and viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UiDesign {
    #[serde(default)]
    pub nodes: IndexMap<NodeKey, UiNode>,
    #[serde(default)]
    pub edges: Vec<UiEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
}

/// Per-node presentation state in the ui payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UiNode {
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub expanded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// One explicit edge in the ui payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiEdge {
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
