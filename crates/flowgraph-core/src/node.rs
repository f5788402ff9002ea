//! Workflow node types and the node structure itself.
//!
//! [`NodeType`] is the closed set of unit-of-work kinds a workflow can
//! contain. [`WorkflowNode`] bundles a type with identity, display fields,
//! canvas position, a configuration block (typed inputs/outputs plus an
//! opaque settings map), and optional presentation state.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field::FieldDescriptor;
use crate::id::NodeKey;

/// The closed set of node types.
///
/// Exhaustive by construction: constraint lookup and template instantiation
/// match on this enum, so an unknown type is unrepresentable rather than a
/// runtime failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    Start,
    End,
    Condition,
    Fork,
    ForEach,
    AiChat,
    DataProcess,
    ScriptCode,
    PluginCall,
    KnowledgeLookup,
}

impl NodeType {
    /// All node types, in declaration order.
    pub const ALL: [NodeType; 10] = [
        NodeType::Start,
        NodeType::End,
        NodeType::Condition,
        NodeType::Fork,
        NodeType::ForEach,
        NodeType::AiChat,
        NodeType::DataProcess,
        NodeType::ScriptCode,
        NodeType::PluginCall,
        NodeType::KnowledgeLookup,
    ];

    /// Stable lowercase slug, used as the node-key prefix and the wire
    /// representation.
    pub fn slug(self) -> &'static str {
        match self {
            NodeType::Start => "start",
            NodeType::End => "end",
            NodeType::Condition => "condition",
            NodeType::Fork => "fork",
            NodeType::ForEach => "for-each",
            NodeType::AiChat => "ai-chat",
            NodeType::DataProcess => "data-process",
            NodeType::ScriptCode => "script-code",
            NodeType::PluginCall => "plugin-call",
            NodeType::KnowledgeLookup => "knowledge-lookup",
        }
    }

    /// Human-readable display name, used as the default node title.
    pub fn display_name(self) -> &'static str {
        match self {
            NodeType::Start => "Start",
            NodeType::End => "End",
            NodeType::Condition => "Condition",
            NodeType::Fork => "Fork",
            NodeType::ForEach => "For Each",
            NodeType::AiChat => "AI Chat",
            NodeType::DataProcess => "Data Process",
            NodeType::ScriptCode => "Script Code",
            NodeType::PluginCall => "Plugin Call",
            NodeType::KnowledgeLookup => "Knowledge Lookup",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// 2D canvas position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    /// Returns this position shifted by a delta (used by node copy).
    pub fn offset_by(self, dx: f64, dy: f64) -> Self {
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Presentation state the canvas tracks per node. Not a structural concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    #[serde(default)]
    pub expanded: bool,
    #[serde(default)]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// A node's configuration block: typed inputs/outputs and the opaque
/// settings map.
///
/// Settings preserve insertion order (the admin UI renders them as entered),
/// hence `IndexMap`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfig {
    #[serde(default)]
    pub inputs: Vec<FieldDescriptor>,
    #[serde(default)]
    pub outputs: Vec<FieldDescriptor>,
    #[serde(default)]
    pub settings: IndexMap<String, Value>,
}

impl NodeConfig {
    /// Explicit structural clone of the whole block.
    pub fn deep_clone(&self) -> NodeConfig {
        NodeConfig {
            inputs: self.inputs.iter().map(FieldDescriptor::deep_clone).collect(),
            outputs: self.outputs.iter().map(FieldDescriptor::deep_clone).collect(),
            settings: self.settings.clone(),
        }
    }

    /// The effective value of a named input: the settings entry when
    /// present, otherwise the descriptor's own value.
    pub fn effective_input_value<'a>(&'a self, field: &'a FieldDescriptor) -> &'a Value {
        self.settings.get(&field.name).unwrap_or(&field.value)
    }
}

/// A typed unit of work in the workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
    pub key: NodeKey,
    pub node_type: NodeType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub config: NodeConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation: Option<Presentation>,
}

impl WorkflowNode {
    /// Explicit structural clone under a new key (used by node copy).
    pub fn deep_clone_as(&self, key: NodeKey) -> WorkflowNode {
        WorkflowNode {
            key,
            node_type: self.node_type,
            name: self.name.clone(),
            description: self.description.clone(),
            position: self.position,
            config: self.config.deep_clone(),
            presentation: self.presentation.clone(),
        }
    }
}
