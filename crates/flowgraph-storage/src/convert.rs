//! Pure adapters between the canonical, wire, and editor-canvas formats.
//!
//! Each direction is lossless for the fields the source format owns and
//! reconstructs edges when the source omits them. Decode failures in
//! string-encoded sub-payloads degrade to the empty structure, but every
//! such failure is logged and reported as a [`DecodeIssue`] so data loss is
//! visible to the caller.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use flowgraph_core::{
    KeyGenerator, NodeConfig, NodeKey, Position, Presentation, Viewport, WorkflowEdge,
    WorkflowGraph, WorkflowNode,
};

use crate::canvas::{AttachedEdge, CanvasData, CanvasGraph, CanvasMeta, CanvasNode, EdgeData};
use crate::error::StorageError;
use crate::wire::{NodeDesign, RawPayload, UiDesign, UiEdge, UiNode, WorkflowConfig};

/// Default layout when no presentation entry exists for a node: fixed
/// vertical offset, horizontal stride proportional to the node's index.
const LAYOUT_X_BASE: f64 = 120.0;
const LAYOUT_X_STRIDE: f64 = 320.0;
const LAYOUT_Y: f64 = 200.0;

/// A recorded, non-fatal decode problem encountered during conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeIssue {
    /// Which wire field failed to decode.
    pub context: &'static str,
    pub message: String,
}

impl fmt::Display for DecodeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.message)
    }
}

fn none_if_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn default_position(index: usize) -> Position {
    Position::new(LAYOUT_X_BASE + LAYOUT_X_STRIDE * index as f64, LAYOUT_Y)
}

// ---------------------------------------------------------------------------
// Wire -> canonical
// ---------------------------------------------------------------------------

/// Converts the persisted wire shape into a canonical graph.
///
/// Draft fields take precedence over published fields. The ui payload's
/// explicit edge list is authoritative when it carries any edges; otherwise
/// the edge set is reconstructed from each node's `next_node_keys`.
/// Structurally broken wire entries (duplicate keys, dangling neighbor
/// references) are skipped and reported.
pub fn wire_to_canonical(config: &WorkflowConfig) -> (WorkflowGraph, Vec<DecodeIssue>) {
    let mut issues = Vec::new();

    let designs: Vec<NodeDesign> = match (&config.function_design_draft, &config.function_design) {
        (Some(draft), _) => draft.clone(),
        (None, Some(raw)) => decode_or_empty(raw, "functionDesign", &mut issues),
        (None, None) => Vec::new(),
    };

    let ui: Option<UiDesign> = match (&config.ui_design_draft, &config.ui_design) {
        (Some(raw), _) => decode_ui(raw, "uiDesignDraft", &mut issues),
        (None, Some(raw)) => decode_ui(raw, "uiDesign", &mut issues),
        (None, None) => None,
    };

    let mut graph = WorkflowGraph::new(config.id.clone(), config.name.clone());
    graph.description = config.description.clone();
    if let Some(viewport) = ui.as_ref().and_then(|u| u.viewport) {
        graph.viewport = viewport;
    }

    for (index, design) in designs.iter().enumerate() {
        let ui_node = ui.as_ref().and_then(|u| u.nodes.get(&design.node_key));
        let node = WorkflowNode {
            key: design.node_key.clone(),
            node_type: design.node_type,
            name: design.name.clone(),
            description: none_if_empty(&design.description),
            position: ui_node.map(|u| u.position).unwrap_or_else(|| default_position(index)),
            config: NodeConfig {
                inputs: design.input_fields.clone(),
                outputs: design.output_fields.clone(),
                settings: design.field_designs.clone(),
            },
            presentation: ui_node.map(|u| Presentation {
                expanded: u.expanded,
                selected: false,
                width: u.width,
                height: u.height,
            }),
        };
        if graph.push_node(node).is_err() {
            tracing::warn!(key = %design.node_key, "duplicate node key in wire design, skipping");
            issues.push(DecodeIssue {
                context: "functionDesign",
                message: format!("duplicate node key '{}' skipped", design.node_key),
            });
        }
    }

    let explicit_edges = ui.as_ref().map(|u| u.edges.as_slice()).unwrap_or(&[]);
    if !explicit_edges.is_empty() {
        for ui_edge in explicit_edges {
            push_edge_tolerant(
                &mut graph,
                ui_edge.source.clone(),
                ui_edge.target.clone(),
                EdgeData {
                    source_port: ui_edge.source_port.clone(),
                    target_port: ui_edge.target_port.clone(),
                    condition: ui_edge.condition.clone(),
                    label: ui_edge.label.clone(),
                },
            );
        }
    } else {
        // Fallback edge reconstruction from per-node neighbor lists.
        for design in &designs {
            for next in &design.next_node_keys {
                push_edge_tolerant(
                    &mut graph,
                    design.node_key.clone(),
                    next.clone(),
                    EdgeData::default(),
                );
            }
        }
    }

    (graph, issues)
}

fn decode_or_empty(
    raw: &RawPayload,
    context: &'static str,
    issues: &mut Vec<DecodeIssue>,
) -> Vec<NodeDesign> {
    match raw.decode::<Vec<NodeDesign>>(context) {
        Ok(designs) => designs,
        Err(err) => {
            tracing::warn!(context, error = %err, "design payload decode failed, using empty list");
            issues.push(DecodeIssue {
                context,
                message: err.to_string(),
            });
            Vec::new()
        }
    }
}

fn decode_ui(
    raw: &RawPayload,
    context: &'static str,
    issues: &mut Vec<DecodeIssue>,
) -> Option<UiDesign> {
    match raw.decode::<UiDesign>(context) {
        Ok(ui) => Some(ui),
        Err(err) => {
            tracing::warn!(context, error = %err, "ui payload decode failed, ignoring presentation");
            issues.push(DecodeIssue {
                context,
                message: err.to_string(),
            });
            None
        }
    }
}

/// Appends an edge if both endpoints exist, it is not a self-loop, and the
/// (source, target) pair is not already present. Anything else is silently
/// dropped: external data is allowed to be partially broken, and the
/// validator reports what remains.
fn push_edge_tolerant(graph: &mut WorkflowGraph, source: NodeKey, target: NodeKey, data: EdgeData) {
    if source == target
        || !graph.contains_node(&source)
        || !graph.contains_node(&target)
        || graph.has_pair(&source, &target)
    {
        return;
    }
    let mut edge = WorkflowEdge::between(source, target);
    edge.source_port = data.source_port;
    edge.target_port = data.target_port;
    edge.condition = data.condition;
    edge.label = data.label;
    // Key collisions are impossible once the pair is unique.
    let _ = graph.push_edge(edge);
}

// ---------------------------------------------------------------------------
// Canonical -> wire
// ---------------------------------------------------------------------------

/// Converts a canonical graph back into the wire shape.
///
/// Each node's `next_node_keys` is recomputed by grouping edges by source,
/// the inverse of the fallback reconstruction above. Presentation state is
/// embedded as the draft ui payload. Identity fields the canonical model
/// does not own (`app_id`, `is_publish`, published payloads) are carried
/// over from `base` when provided.
pub fn canonical_to_wire(
    graph: &WorkflowGraph,
    base: Option<&WorkflowConfig>,
) -> Result<WorkflowConfig, StorageError> {
    let mut next_by_source: HashMap<&NodeKey, Vec<NodeKey>> = HashMap::new();
    for edge in &graph.edges {
        next_by_source
            .entry(&edge.source)
            .or_default()
            .push(edge.target.clone());
    }

    let designs: Vec<NodeDesign> = graph
        .nodes
        .iter()
        .map(|node| NodeDesign {
            node_key: node.key.clone(),
            node_type: node.node_type,
            name: node.name.clone(),
            description: node.description.clone().unwrap_or_default(),
            input_fields: node.config.inputs.clone(),
            output_fields: node.config.outputs.clone(),
            field_designs: node.config.settings.clone(),
            next_node_keys: next_by_source.remove(&node.key).unwrap_or_default(),
        })
        .collect();

    let ui = UiDesign {
        nodes: graph
            .nodes
            .iter()
            .map(|node| {
                let presentation = node.presentation.clone().unwrap_or_default();
                (
                    node.key.clone(),
                    UiNode {
                        position: node.position,
                        expanded: presentation.expanded,
                        width: presentation.width,
                        height: presentation.height,
                    },
                )
            })
            .collect(),
        edges: graph
            .edges
            .iter()
            .map(|edge| UiEdge {
                source: edge.source.clone(),
                target: edge.target.clone(),
                source_port: edge.source_port.clone(),
                target_port: edge.target_port.clone(),
                condition: edge.condition.clone(),
                label: edge.label.clone(),
            })
            .collect(),
        viewport: Some(graph.viewport),
    };
    let ui_payload = RawPayload::embed(&ui).map_err(|source| StorageError::Decode {
        context: "uiDesignDraft",
        source,
    })?;

    Ok(WorkflowConfig {
        id: graph.id.clone(),
        app_id: base.map(|b| b.app_id.clone()).unwrap_or_default(),
        name: graph.name.clone(),
        description: graph.description.clone(),
        function_design: base.and_then(|b| b.function_design.clone()),
        function_design_draft: Some(designs),
        ui_design: base.and_then(|b| b.ui_design.clone()),
        ui_design_draft: Some(ui_payload),
        is_publish: base.map(|b| b.is_publish).unwrap_or(false),
    })
}

// ---------------------------------------------------------------------------
// Canonical <-> editor-canvas
// ---------------------------------------------------------------------------

/// Converts a canonical graph into the canvas shape.
///
/// Every edge is attached to its source node's outgoing list; the top-level
/// edge list is left empty so the two representations never both carry
/// edges.
pub fn canonical_to_canvas(graph: &WorkflowGraph) -> CanvasGraph {
    let nodes = graph
        .nodes
        .iter()
        .map(|node| {
            let presentation = node.presentation.clone().unwrap_or_default();
            CanvasNode {
                id: node.key.clone(),
                node_type: node.node_type,
                meta: CanvasMeta {
                    position: node.position,
                    default_expanded: presentation.expanded,
                },
                data: CanvasData {
                    title: node.name.clone(),
                    content: node.description.clone().unwrap_or_default(),
                    input_fields: node.config.inputs.clone(),
                    output_fields: node.config.outputs.clone(),
                    settings: node.config.settings.clone(),
                },
                edges: graph
                    .outgoing(&node.key)
                    .map(|edge| AttachedEdge {
                        target_node_id: edge.target.clone(),
                        data: EdgeData {
                            source_port: edge.source_port.clone(),
                            target_port: edge.target_port.clone(),
                            condition: edge.condition.clone(),
                            label: edge.label.clone(),
                        },
                    })
                    .collect(),
            }
        })
        .collect();

    CanvasGraph {
        nodes,
        edges: Vec::new(),
        viewport: graph.viewport,
    }
}

/// Converts a canvas shape back into a canonical graph.
///
/// Edges are read from the per-node attachments first; top-level edges are
/// then merged in when their reconstructed key is not already present
/// (tolerance for partially-populated external data).
pub fn canvas_to_canonical(
    canvas: &CanvasGraph,
    id: impl Into<String>,
    name: impl Into<String>,
) -> WorkflowGraph {
    let mut graph = WorkflowGraph::new(id, name);
    graph.viewport = canvas.viewport;

    for canvas_node in &canvas.nodes {
        let node = WorkflowNode {
            key: canvas_node.id.clone(),
            node_type: canvas_node.node_type,
            name: canvas_node.data.title.clone(),
            description: none_if_empty(&canvas_node.data.content),
            position: canvas_node.meta.position,
            config: NodeConfig {
                inputs: canvas_node.data.input_fields.clone(),
                outputs: canvas_node.data.output_fields.clone(),
                settings: canvas_node.data.settings.clone(),
            },
            presentation: Some(Presentation {
                expanded: canvas_node.meta.default_expanded,
                selected: false,
                width: None,
                height: None,
            }),
        };
        if graph.push_node(node).is_err() {
            tracing::warn!(key = %canvas_node.id, "duplicate canvas node id, skipping");
        }
    }

    for canvas_node in &canvas.nodes {
        for attached in &canvas_node.edges {
            push_edge_tolerant(
                &mut graph,
                canvas_node.id.clone(),
                attached.target_node_id.clone(),
                attached.data.clone(),
            );
        }
    }

    for top_level in &canvas.edges {
        let key = KeyGenerator::edge_key(&top_level.source_node_id, &top_level.target_node_id);
        if graph.edge(&key).is_none() {
            push_edge_tolerant(
                &mut graph,
                top_level.source_node_id.clone(),
                top_level.target_node_id.clone(),
                top_level.data.clone(),
            );
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasEdge;
    use flowgraph_core::node::NodeType;
    use flowgraph_core::template;
    use serde_json::json;

    fn canonical_fixture() -> WorkflowGraph {
        let mut g = WorkflowGraph::new("wf-1", "fixture");
        g.description = "adapter fixture".into();
        for (key, ty) in [
            ("start_1", NodeType::Start),
            ("chat_1", NodeType::AiChat),
            ("end_1", NodeType::End),
        ] {
            let mut node =
                template::instantiate(ty, NodeKey::from(key), Position::new(10.0, 20.0));
            node.presentation = Some(Presentation {
                expanded: true,
                selected: false,
                width: Some(240.0),
                height: None,
            });
            g.push_node(node).unwrap();
        }
        let mut edge = WorkflowEdge::between("start_1".into(), "chat_1".into());
        edge.label = Some("go".into());
        g.push_edge(edge).unwrap();
        g.push_edge(WorkflowEdge::between("chat_1".into(), "end_1".into()))
            .unwrap();
        g
    }

    fn pairs(graph: &WorkflowGraph) -> Vec<(String, String)> {
        graph
            .edges
            .iter()
            .map(|e| (e.source.0.clone(), e.target.0.clone()))
            .collect()
    }

    #[test]
    fn wire_roundtrip_preserves_nodes_edges_and_fields() {
        let original = canonical_fixture();
        let config = canonical_to_wire(&original, None).unwrap();
        let (back, issues) = wire_to_canonical(&config);

        assert!(issues.is_empty());
        assert_eq!(back.node_count(), original.node_count());
        assert_eq!(pairs(&back), pairs(&original));
        for (a, b) in original.nodes.iter().zip(back.nodes.iter()) {
            assert_eq!(a.key, b.key);
            assert_eq!(a.node_type, b.node_type);
            assert_eq!(a.config.inputs, b.config.inputs);
            assert_eq!(a.config.outputs, b.config.outputs);
            assert_eq!(a.config.settings, b.config.settings);
            assert_eq!(a.position, b.position);
        }
    }

    #[test]
    fn wire_next_node_keys_are_grouped_by_source() {
        let graph = canonical_fixture();
        let config = canonical_to_wire(&graph, None).unwrap();
        let designs = config.function_design_draft.unwrap();

        let start = designs.iter().find(|d| d.node_key.0 == "start_1").unwrap();
        assert_eq!(start.next_node_keys, vec![NodeKey::from("chat_1")]);
        let end = designs.iter().find(|d| d.node_key.0 == "end_1").unwrap();
        assert!(end.next_node_keys.is_empty());
    }

    #[test]
    fn edges_reconstruct_from_next_node_keys_without_ui_payload() {
        let graph = canonical_fixture();
        let mut config = canonical_to_wire(&graph, None).unwrap();
        config.ui_design_draft = None;
        config.ui_design = None;

        let (back, issues) = wire_to_canonical(&config);
        assert!(issues.is_empty());
        assert_eq!(pairs(&back), pairs(&graph));
        // With no presentation payload, positions fall back to the
        // deterministic layout.
        assert_eq!(back.nodes[0].position, Position::new(120.0, 200.0));
        assert_eq!(back.nodes[1].position, Position::new(440.0, 200.0));
        assert_eq!(back.nodes[2].position, Position::new(760.0, 200.0));
    }

    #[test]
    fn explicit_ui_edge_list_takes_priority_over_next_node_keys() {
        let graph = canonical_fixture();
        let mut config = canonical_to_wire(&graph, None).unwrap();

        // Tamper with the ui edge list: drop the chat_1 -> end_1 edge.
        let mut ui: UiDesign = config
            .ui_design_draft
            .as_ref()
            .unwrap()
            .decode("uiDesignDraft")
            .unwrap();
        ui.edges.retain(|e| e.target.0 != "end_1");
        config.ui_design_draft = Some(RawPayload::embed(&ui).unwrap());

        let (back, _) = wire_to_canonical(&config);
        // next_node_keys still lists both edges, but the ui list wins.
        assert_eq!(back.edge_count(), 1);
        assert_eq!(pairs(&back), vec![("start_1".into(), "chat_1".into())]);
    }

    #[test]
    fn empty_ui_edge_list_falls_back_to_next_node_keys() {
        let graph = canonical_fixture();
        let mut config = canonical_to_wire(&graph, None).unwrap();

        // Legacy records may carry a ui payload whose edge list was never
        // populated; an empty list must not erase the graph's edges.
        let mut ui: UiDesign = config
            .ui_design_draft
            .as_ref()
            .unwrap()
            .decode("uiDesignDraft")
            .unwrap();
        ui.edges.clear();
        config.ui_design_draft = Some(RawPayload::embed(&ui).unwrap());

        let (back, issues) = wire_to_canonical(&config);
        assert!(issues.is_empty());
        assert_eq!(pairs(&back), pairs(&graph));
        // The ui node entries still drive placement.
        assert_eq!(back.nodes[0].position, Position::new(10.0, 20.0));
    }

    #[test]
    fn draft_design_is_preferred_over_published() {
        let graph = canonical_fixture();
        let mut config = canonical_to_wire(&graph, None).unwrap();

        // Publish a single-node design; the draft should still win.
        let published = vec![NodeDesign {
            node_key: NodeKey::from("only_1"),
            node_type: NodeType::Start,
            name: "Old".into(),
            description: String::new(),
            input_fields: vec![],
            output_fields: vec![],
            field_designs: Default::default(),
            next_node_keys: vec![],
        }];
        config.function_design = Some(RawPayload::embed(&published).unwrap());

        let (back, _) = wire_to_canonical(&config);
        assert_eq!(back.node_count(), 3);

        config.function_design_draft = None;
        config.ui_design_draft = None;
        config.ui_design = None;
        let (back, _) = wire_to_canonical(&config);
        assert_eq!(back.node_count(), 1);
        assert_eq!(back.nodes[0].key, NodeKey::from("only_1"));
    }

    #[test]
    fn broken_string_payload_degrades_with_issue() {
        let config = WorkflowConfig {
            id: "wf-broken".into(),
            name: "broken".into(),
            function_design: Some(RawPayload::Text("{definitely not json".into())),
            ..Default::default()
        };

        let (graph, issues) = wire_to_canonical(&config);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].context, "functionDesign");
    }

    #[test]
    fn string_encoded_design_decodes() {
        let graph = canonical_fixture();
        let config = canonical_to_wire(&graph, None).unwrap();
        let designs = config.function_design_draft.clone().unwrap();

        let encoded = WorkflowConfig {
            id: config.id.clone(),
            name: config.name.clone(),
            function_design: Some(RawPayload::Text(
                serde_json::to_string(&designs).unwrap(),
            )),
            ..Default::default()
        };
        let (back, issues) = wire_to_canonical(&encoded);
        assert!(issues.is_empty());
        assert_eq!(back.node_count(), 3);
        assert_eq!(pairs(&back), pairs(&graph));
    }

    #[test]
    fn canvas_roundtrip_preserves_nodes_and_edges() {
        let original = canonical_fixture();
        let canvas = canonical_to_canvas(&original);

        // The two representations must not both carry edges.
        assert!(canvas.edges.is_empty());
        let attached: usize = canvas.nodes.iter().map(|n| n.edges.len()).sum();
        assert_eq!(attached, original.edge_count());

        let back = canvas_to_canonical(&canvas, original.id.clone(), original.name.clone());
        assert_eq!(back.node_count(), original.node_count());
        assert_eq!(pairs(&back), pairs(&original));
        // Edge payload survives.
        let edge = back.edge(&"start_1->chat_1".into()).unwrap();
        assert_eq!(edge.label.as_deref(), Some("go"));
    }

    #[test]
    fn canvas_top_level_edges_are_merged_and_deduplicated() {
        let original = canonical_fixture();
        let mut canvas = canonical_to_canvas(&original);

        // Externally produced data: one duplicate of an attached edge and
        // one edge that exists only at the top level.
        canvas.edges.push(CanvasEdge {
            source_node_id: "start_1".into(),
            target_node_id: "chat_1".into(),
            data: EdgeData::default(),
        });
        canvas.edges.push(CanvasEdge {
            source_node_id: "start_1".into(),
            target_node_id: "end_1".into(),
            data: EdgeData {
                label: Some("shortcut".into()),
                ..Default::default()
            },
        });

        let back = canvas_to_canonical(&canvas, "wf-1", "fixture");
        assert_eq!(back.edge_count(), 3);
        let merged = back.edge(&"start_1->end_1".into()).unwrap();
        assert_eq!(merged.label.as_deref(), Some("shortcut"));
    }

    #[test]
    fn tolerant_edge_push_drops_broken_wire_edges() {
        let mut config = canonical_to_wire(&canonical_fixture(), None).unwrap();
        config.ui_design_draft = None;
        config.ui_design = None;
        if let Some(designs) = config.function_design_draft.as_mut() {
            // Dangling neighbor and a self reference.
            designs[0].next_node_keys.push(NodeKey::from("ghost"));
            designs[1].next_node_keys.push(NodeKey::from("chat_1"));
        }

        let (back, _) = wire_to_canonical(&config);
        assert_eq!(back.edge_count(), 2);
    }

    #[test]
    fn base_config_identity_fields_are_carried_over() {
        let base = WorkflowConfig {
            id: "wf-1".into(),
            app_id: "app-7".into(),
            name: "old name".into(),
            is_publish: true,
            ..Default::default()
        };
        let graph = canonical_fixture();
        let config = canonical_to_wire(&graph, Some(&base)).unwrap();

        assert_eq!(config.app_id, "app-7");
        assert!(config.is_publish);
        // Canonical identity wins over the base copy.
        assert_eq!(config.name, "fixture");
    }

    #[test]
    fn settings_values_survive_the_wire() {
        let mut graph = canonical_fixture();
        graph
            .node_mut(&"chat_1".into())
            .unwrap()
            .config
            .settings
            .insert("prompt".into(), json!("You are a helpful assistant"));

        let config = canonical_to_wire(&graph, None).unwrap();
        let (back, _) = wire_to_canonical(&config);
        assert_eq!(
            back.node(&"chat_1".into()).unwrap().config.settings["prompt"],
            json!("You are a helpful assistant")
        );
    }
}
