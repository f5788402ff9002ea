//! Cycle detection over the directed edge set.
//!
//! An explicit stack-based three-color depth-first traversal. Every node is
//! used as a traversal root, so disconnected components terminate correctly.
//! An edge into a node currently on the traversal stack indicates a cycle;
//! the path from that node to the top of the stack is returned as the cycle.
//!
//! The traversal never mutates shared state between calls, so it can be run
//! against a snapshot plus one provisional edge ([`would_cycle`]) without
//! touching the graph.

use std::collections::HashMap;

use indexmap::IndexMap;
use smallvec::SmallVec;

use flowgraph_core::{NodeKey, WorkflowGraph};

type Adjacency<'a> = IndexMap<&'a NodeKey, SmallVec<[&'a NodeKey; 4]>>;

#[derive(Clone, Copy, PartialEq)]
enum Color {
    Grey,
    Black,
}

/// Builds the successor map in node insertion order for deterministic
/// traversal. Edges with a dangling endpoint are skipped here; the validator
/// reports those separately as invalid connections.
fn adjacency(graph: &WorkflowGraph) -> Adjacency<'_> {
    let mut adj: Adjacency<'_> = graph.nodes.iter().map(|n| (&n.key, SmallVec::new())).collect();
    for edge in &graph.edges {
        if adj.contains_key(&edge.target) {
            if let Some(successors) = adj.get_mut(&edge.source) {
                successors.push(&edge.target);
            }
        }
    }
    adj
}

fn find_cycle_in(adj: &Adjacency<'_>) -> Option<Vec<NodeKey>> {
    let mut colors: HashMap<&NodeKey, Color> = HashMap::new();

    for &root in adj.keys() {
        if colors.contains_key(root) {
            continue;
        }

        // Frame: (node, index of the next successor to visit).
        let mut stack: Vec<(&NodeKey, usize)> = vec![(root, 0)];
        let mut path: Vec<&NodeKey> = vec![root];
        colors.insert(root, Color::Grey);

        while let Some((node, next)) = stack.last_mut() {
            let successors = &adj[*node];
            if *next < successors.len() {
                let child = successors[*next];
                *next += 1;
                match colors.get(child) {
                    None => {
                        colors.insert(child, Color::Grey);
                        stack.push((child, 0));
                        path.push(child);
                    }
                    Some(Color::Grey) => {
                        // Back edge: the cycle is the path suffix starting
                        // at the on-stack node.
                        let pos = path
                            .iter()
                            .position(|k| *k == child)
                            .unwrap_or(path.len() - 1);
                        return Some(path[pos..].iter().map(|k| (*k).clone()).collect());
                    }
                    Some(Color::Black) => {}
                }
            } else {
                colors.insert(*node, Color::Black);
                stack.pop();
                path.pop();
            }
        }
    }

    None
}

/// Returns the node path of the first directed cycle found, or `None` when
/// the graph is acyclic.
pub fn find_cycle(graph: &WorkflowGraph) -> Option<Vec<NodeKey>> {
    find_cycle_in(&adjacency(graph))
}

/// Would adding an edge `source -> target` introduce a cycle?
///
/// Runs the detector against the current edge set plus the provisional
/// edge; the graph itself is not touched. Unknown endpoints never cycle
/// (their absence is rejected before this check runs).
pub fn would_cycle(graph: &WorkflowGraph, source: &NodeKey, target: &NodeKey) -> bool {
    let Some(target_node) = graph.node(target) else {
        return false;
    };
    if !graph.contains_node(source) {
        return false;
    }
    let mut adj = adjacency(graph);
    if let Some(successors) = adj.get_mut(source) {
        successors.push(&target_node.key);
    }
    find_cycle_in(&adj).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowgraph_core::node::{NodeType, Position};
    use flowgraph_core::{template, WorkflowEdge};

    fn graph_with(nodes: &[&str], edges: &[(&str, &str)]) -> WorkflowGraph {
        let mut g = WorkflowGraph::new("wf", "cycles");
        for key in nodes {
            g.push_node(template::instantiate(
                NodeType::DataProcess,
                NodeKey::from(*key),
                Position::default(),
            ))
            .unwrap();
        }
        for (s, t) in edges {
            g.push_edge(WorkflowEdge::between(NodeKey::from(*s), NodeKey::from(*t)))
                .unwrap();
        }
        g
    }

    #[test]
    fn acyclic_chain_has_no_cycle() {
        let g = graph_with(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        assert_eq!(find_cycle(&g), None);
    }

    #[test]
    fn diamond_is_acyclic() {
        let g = graph_with(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        );
        assert_eq!(find_cycle(&g), None);
    }

    #[test]
    fn back_edge_is_reported_with_its_path() {
        let g = graph_with(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let cycle = find_cycle(&g).expect("cycle expected");
        assert_eq!(cycle.len(), 3);
        assert!(cycle.contains(&NodeKey::from("a")));
        assert!(cycle.contains(&NodeKey::from("b")));
        assert!(cycle.contains(&NodeKey::from("c")));
    }

    #[test]
    fn cycle_in_disconnected_component_is_found() {
        // Component {a -> b} is clean; {c <-> d} is cyclic and unreachable
        // from a.
        let g = graph_with(&["a", "b", "c", "d"], &[("a", "b"), ("c", "d"), ("d", "c")]);
        let cycle = find_cycle(&g).expect("cycle expected");
        assert_eq!(cycle.len(), 2);
    }

    #[test]
    fn would_cycle_detects_the_provisional_back_edge() {
        let g = graph_with(&["a", "b"], &[("a", "b")]);
        assert!(would_cycle(&g, &NodeKey::from("b"), &NodeKey::from("a")));
        assert!(!would_cycle(&g, &NodeKey::from("a"), &NodeKey::from("b")));
    }

    #[test]
    fn would_cycle_leaves_graph_untouched() {
        let g = graph_with(&["a", "b"], &[("a", "b")]);
        let before = g.clone();
        let _ = would_cycle(&g, &NodeKey::from("b"), &NodeKey::from("a"));
        assert_eq!(g, before);
    }

    #[test]
    fn would_cycle_false_for_unknown_endpoints() {
        let g = graph_with(&["a"], &[]);
        assert!(!would_cycle(&g, &NodeKey::from("a"), &NodeKey::from("ghost")));
    }
}
