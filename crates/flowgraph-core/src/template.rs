//! Default node templates, one per node type.
//!
//! A template describes what a freshly added node of a type looks like: its
//! display name, declared inputs/outputs, and default settings.
//! [`instantiate`] deep-clones the descriptor lists, so a template is never
//! mutated by editing the node it seeded.

use indexmap::IndexMap;
use serde_json::{json, Value};

use crate::field::{FieldDescriptor, FieldType};
use crate::id::NodeKey;
use crate::node::{NodeConfig, NodeType, Position, WorkflowNode};

/// The default shape of a node of a given type.
#[derive(Debug, Clone)]
pub struct NodeTemplate {
    pub inputs: Vec<FieldDescriptor>,
    pub outputs: Vec<FieldDescriptor>,
    pub settings: IndexMap<String, Value>,
}

/// Builds the default template for `node_type`.
pub fn template_for(node_type: NodeType) -> NodeTemplate {
    let mut settings = IndexMap::new();
    let (inputs, outputs) = match node_type {
        NodeType::Start => (
            vec![],
            vec![FieldDescriptor::new("params", FieldType::Object, false)],
        ),
        NodeType::End => (
            vec![FieldDescriptor::new("result", FieldType::Dynamic, false)],
            vec![],
        ),
        NodeType::Condition => {
            settings.insert("expression".into(), json!(""));
            (
                vec![FieldDescriptor::new("input", FieldType::Dynamic, true)],
                vec![FieldDescriptor::new("matched", FieldType::Boolean, false)],
            )
        }
        NodeType::Fork => (
            vec![FieldDescriptor::new("input", FieldType::Dynamic, false)],
            vec![FieldDescriptor::new("branches", FieldType::Array, false)],
        ),
        NodeType::ForEach => (
            vec![FieldDescriptor::new("items", FieldType::Array, true)],
            vec![FieldDescriptor::new("item", FieldType::Dynamic, false)],
        ),
        NodeType::AiChat => {
            settings.insert("model".into(), json!(""));
            settings.insert("prompt".into(), json!(""));
            settings.insert("temperature".into(), json!(0.7));
            (
                vec![FieldDescriptor::new("query", FieldType::String, true)],
                vec![FieldDescriptor::new("reply", FieldType::String, false)],
            )
        }
        NodeType::DataProcess => {
            settings.insert("operations".into(), json!([]));
            (
                vec![FieldDescriptor::new("data", FieldType::Dynamic, true)],
                vec![FieldDescriptor::new("result", FieldType::Dynamic, false)],
            )
        }
        NodeType::ScriptCode => {
            settings.insert("language".into(), json!("javascript"));
            settings.insert("code".into(), json!(""));
            (
                vec![FieldDescriptor::new("args", FieldType::Map, false)],
                vec![FieldDescriptor::new("result", FieldType::Dynamic, false)],
            )
        }
        NodeType::PluginCall => {
            settings.insert("pluginId".into(), json!(""));
            settings.insert("templateId".into(), json!(""));
            (
                vec![FieldDescriptor::new("params", FieldType::Map, false)],
                vec![FieldDescriptor::new("result", FieldType::Dynamic, false)],
            )
        }
        NodeType::KnowledgeLookup => {
            settings.insert("knowledgeBaseId".into(), json!(""));
            settings.insert("topK".into(), json!(4));
            (
                vec![FieldDescriptor::new("query", FieldType::String, true)],
                vec![FieldDescriptor::new("chunks", FieldType::Array, false)],
            )
        }
    };

    NodeTemplate {
        inputs,
        outputs,
        settings,
    }
}

/// Seeds a new node of `node_type` at `position` from the type's template.
///
/// Field descriptor lists are deep-cloned out of the template.
pub fn instantiate(node_type: NodeType, key: NodeKey, position: Position) -> WorkflowNode {
    let template = template_for(node_type);
    WorkflowNode {
        key,
        node_type,
        name: node_type.display_name().to_string(),
        description: None,
        position,
        config: NodeConfig {
            inputs: template.inputs.iter().map(FieldDescriptor::deep_clone).collect(),
            outputs: template.outputs.iter().map(FieldDescriptor::deep_clone).collect(),
            settings: template.settings,
        },
        presentation: None,
    }
}
