//! Property tests for cycle detection, using petgraph as the oracle.

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use proptest::prelude::*;

use flowgraph_core::node::{NodeType, Position};
use flowgraph_core::{template, EdgeKey, NodeKey, WorkflowEdge, WorkflowGraph};

const NODES: usize = 8;

fn build_workflow(edges: &[(usize, usize)]) -> WorkflowGraph {
    let mut graph = WorkflowGraph::new("wf", "prop");
    for i in 0..NODES {
        graph
            .push_node(template::instantiate(
                NodeType::DataProcess,
                NodeKey::from(format!("n{i}")),
                Position::default(),
            ))
            .expect("unique keys");
    }
    // Push raw edges (unique synthetic keys) so duplicate pairs and
    // self-loops reach the detector too.
    for (i, (s, t)) in edges.iter().enumerate() {
        graph.edges.push(WorkflowEdge {
            key: EdgeKey::from(format!("e{i}")),
            source: NodeKey::from(format!("n{s}")),
            target: NodeKey::from(format!("n{t}")),
            source_port: None,
            target_port: None,
            condition: None,
            label: None,
        });
    }
    graph
}

fn build_oracle(edges: &[(usize, usize)]) -> DiGraph<(), ()> {
    let mut graph = DiGraph::new();
    let indices: Vec<NodeIndex> = (0..NODES).map(|_| graph.add_node(())).collect();
    for (s, t) in edges {
        graph.add_edge(indices[*s], indices[*t], ());
    }
    graph
}

proptest! {
    #[test]
    fn detector_agrees_with_petgraph(
        edges in prop::collection::vec((0usize..NODES, 0usize..NODES), 0..24)
    ) {
        let workflow = build_workflow(&edges);
        let oracle = build_oracle(&edges);

        let found = flowgraph_check::find_cycle(&workflow).is_some();
        prop_assert_eq!(found, is_cyclic_directed(&oracle));
    }

    #[test]
    fn reported_cycle_path_is_a_real_cycle(
        edges in prop::collection::vec((0usize..NODES, 0usize..NODES), 0..24)
    ) {
        let workflow = build_workflow(&edges);
        if let Some(path) = flowgraph_check::find_cycle(&workflow) {
            prop_assert!(!path.is_empty());
            // Every consecutive pair, and the wrap-around pair, must be an
            // actual edge in the graph.
            for i in 0..path.len() {
                let source = &path[i];
                let target = &path[(i + 1) % path.len()];
                prop_assert!(
                    workflow.has_pair(source, target),
                    "missing edge {} -> {}", source, target
                );
            }
        }
    }
}
