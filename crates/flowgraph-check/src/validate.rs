//! The validation passes over a graph snapshot.
//!
//! Check order: Start/End cardinality, per-node connectivity against the
//! constraint registry, required-field and field-type checks, structural
//! edge checks, then cycle detection. Findings come back in discovery
//! order.

use std::collections::HashSet;

use flowgraph_core::{FieldDescriptor, NodeKey, NodeType, WorkflowGraph, WorkflowNode};

use crate::cycle::find_cycle;
use crate::finding::{Finding, FindingKind};

/// Which checks a validation pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Everything. Used after structural mutations and on load.
    Strict,
    /// Skips connectivity checks so a detached node can still be tested
    /// interactively. Field and cycle checks stay in force.
    NodeDebug,
}

/// Full validation of a graph snapshot.
pub fn validate(graph: &WorkflowGraph) -> Vec<Finding> {
    run(graph, Mode::Strict)
}

/// Lenient validation for interactive single-node debugging.
pub fn validate_for_run(graph: &WorkflowGraph) -> Vec<Finding> {
    run(graph, Mode::NodeDebug)
}

fn run(graph: &WorkflowGraph, mode: Mode) -> Vec<Finding> {
    let mut findings = Vec::new();

    check_singletons(graph, &mut findings);
    if mode == Mode::Strict {
        check_connectivity(graph, &mut findings);
    }
    for node in &graph.nodes {
        check_fields(node, &mut findings);
    }
    check_edges(graph, &mut findings);
    check_cycles(graph, &mut findings);

    findings
}

/// Exactly one Start and one End is the hard rule, enforced distinctly from
/// the generic min/max bounds.
fn check_singletons(graph: &WorkflowGraph, findings: &mut Vec<Finding>) {
    for (ty, missing, duplicate) in [
        (
            NodeType::Start,
            FindingKind::MissingStartNode,
            FindingKind::DuplicateStartNode,
        ),
        (
            NodeType::End,
            FindingKind::MissingEndNode,
            FindingKind::DuplicateEndNode,
        ),
    ] {
        match graph.count_of_type(ty) {
            0 => findings.push(Finding::graph(
                missing,
                format!("workflow has no {} node", ty.display_name()),
            )),
            1 => {}
            n => findings.push(Finding::graph(
                duplicate,
                format!("workflow has {} {} nodes, expected exactly 1", n, ty.display_name()),
            )),
        }
    }
}

fn check_connectivity(graph: &WorkflowGraph, findings: &mut Vec<Finding>) {
    for node in &graph.nodes {
        let constraints = node.node_type.constraints();
        if constraints.requires_incoming && graph.incoming(&node.key).next().is_none() {
            findings.push(Finding::node(
                FindingKind::DisconnectedNode,
                format!("node '{}' has no incoming connection", node.name),
                node.key.clone(),
            ));
        }
        if constraints.requires_outgoing && graph.outgoing(&node.key).next().is_none() {
            findings.push(Finding::node(
                FindingKind::DisconnectedNode,
                format!("node '{}' has no outgoing connection", node.name),
                node.key.clone(),
            ));
        }
    }
}

fn check_fields(node: &WorkflowNode, findings: &mut Vec<Finding>) {
    for field in &node.config.inputs {
        let value = node.config.effective_input_value(field);
        if field.required && FieldDescriptor::value_is_empty(value) {
            findings.push(Finding::node(
                FindingKind::MissingRequiredField,
                format!("node '{}': required field '{}' is empty", node.name, field.name),
                node.key.clone(),
            ));
        } else if !field.field_type.accepts(value) {
            findings.push(Finding::node(
                FindingKind::InvalidFieldType,
                format!(
                    "node '{}': field '{}' does not match declared type {:?}",
                    node.name, field.name, field.field_type
                ),
                node.key.clone(),
            ));
        }
    }
}

fn check_edges(graph: &WorkflowGraph, findings: &mut Vec<Finding>) {
    let mut seen_pairs: HashSet<(&NodeKey, &NodeKey)> = HashSet::new();
    for edge in &graph.edges {
        if !graph.contains_node(&edge.source) || !graph.contains_node(&edge.target) {
            findings.push(Finding::edge(
                FindingKind::InvalidConnection,
                format!("edge '{}' references a missing node", edge.key),
                edge.key.clone(),
            ));
            continue;
        }
        if edge.source == edge.target {
            findings.push(Finding::edge(
                FindingKind::InvalidConnection,
                format!("edge '{}' connects a node to itself", edge.key),
                edge.key.clone(),
            ));
            continue;
        }
        if !seen_pairs.insert((&edge.source, &edge.target)) {
            findings.push(Finding::edge(
                FindingKind::InvalidConnection,
                format!("duplicate connection from '{}' to '{}'", edge.source, edge.target),
                edge.key.clone(),
            ));
        }
    }
}

fn check_cycles(graph: &WorkflowGraph, findings: &mut Vec<Finding>) {
    if let Some(cycle) = find_cycle(graph) {
        let path = cycle
            .iter()
            .map(|k| k.0.as_str())
            .collect::<Vec<_>>()
            .join(" -> ");
        let head = cycle.first().cloned();
        let mut finding = Finding::graph(
            FindingKind::CyclicDependency,
            format!("workflow contains a cycle: {path}"),
        );
        finding.node = head;
        findings.push(finding);
    }
}
