//! Load/save sessions: the store's only I/O boundary.
//!
//! Loading never fails the caller: a backend error falls back to the
//! default fresh-workflow template and the outcome says so. Saving is the
//! opposite: a failed save leaves every piece of in-memory state untouched
//! (dirty flag included) so the exact same call can be retried.

use flowgraph_core::WorkflowGraph;
use flowgraph_storage::{DecodeIssue, GraphHandle, StorageError, WorkflowRepository};

use crate::store::WorkflowStore;

/// What happened during a load.
#[derive(Debug)]
pub struct LoadOutcome {
    pub store: WorkflowStore,
    /// `true` when the repository failed and the store was seeded from the
    /// default template instead.
    pub fell_back_to_default: bool,
    /// Non-fatal decode problems from the stored record.
    pub issues: Vec<DecodeIssue>,
}

/// Loads a workflow into a fresh store.
///
/// On a repository error the returned store wraps the default template
/// (one Start, one End) under the handle's id, marked dirty because that
/// state exists only in memory.
pub fn load_from<R: WorkflowRepository>(
    repo: &R,
    handle: &GraphHandle,
    fallback_name: &str,
) -> LoadOutcome {
    match repo.load(handle) {
        Ok(loaded) => {
            let mut store = WorkflowStore::from_graph(loaded.graph);
            store.set_canvas_payload(loaded.canvas_payload);
            LoadOutcome {
                store,
                fell_back_to_default: false,
                issues: loaded.issues,
            }
        }
        Err(err) => {
            tracing::warn!(%handle, error = %err, "load failed, seeding default workflow");
            let graph = WorkflowGraph::default_template(handle.0.clone(), fallback_name);
            let mut store = WorkflowStore::from_graph(graph);
            store.set_dirty(true);
            LoadOutcome {
                store,
                fell_back_to_default: true,
                issues: Vec::new(),
            }
        }
    }
}

/// Persists the store's graph and last-known canvas payload.
///
/// Clears the dirty flag only when the repository reports success.
pub fn save_to<R: WorkflowRepository>(
    store: &mut WorkflowStore,
    repo: &mut R,
    handle: &GraphHandle,
) -> Result<(), StorageError> {
    repo.save(handle, store.graph(), store.canvas_payload())?;
    store.set_dirty(false);
    tracing::debug!(%handle, "workflow saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowgraph_core::{NodeType, Position};
    use flowgraph_storage::InMemoryRepository;
    use serde_json::json;

    #[test]
    fn load_of_unknown_handle_falls_back_to_default_template() {
        let repo = InMemoryRepository::new();
        let outcome = load_from(&repo, &GraphHandle::from("missing"), "Untitled");

        assert!(outcome.fell_back_to_default);
        let graph = outcome.store.graph();
        assert_eq!(graph.id, "missing");
        assert_eq!(graph.name, "Untitled");
        assert_eq!(graph.count_of_type(NodeType::Start), 1);
        assert_eq!(graph.count_of_type(NodeType::End), 1);
        // The fallback exists only in memory.
        assert!(outcome.store.is_dirty());
    }

    #[test]
    fn save_then_load_roundtrips_through_the_repository() {
        let mut repo = InMemoryRepository::new();
        let handle = GraphHandle::from("wf-1");

        let mut store = WorkflowStore::new_default("wf-1", "session test");
        let chat = store
            .add_node(NodeType::AiChat, Position::new(440.0, 200.0))
            .unwrap();
        store.add_edge(&"start_1".into(), &chat).unwrap();
        store.add_edge(&chat, &"end_1".into()).unwrap();
        store.set_canvas_payload(Some(json!({"zoom": 0.8})));

        save_to(&mut store, &mut repo, &handle).unwrap();
        assert!(!store.is_dirty());

        let outcome = load_from(&repo, &handle, "unused");
        assert!(!outcome.fell_back_to_default);
        assert!(outcome.issues.is_empty());
        let reloaded = outcome.store.graph();
        assert_eq!(reloaded.node_count(), 3);
        assert_eq!(reloaded.edge_count(), 2);
        assert!(reloaded.has_pair(&"start_1".into(), &chat));
        assert_eq!(outcome.store.canvas_payload(), Some(&json!({"zoom": 0.8})));
        assert!(!outcome.store.is_dirty());
    }

    #[test]
    fn failed_save_keeps_the_store_dirty_and_retryable() {
        let mut repo = InMemoryRepository::new();
        let handle = GraphHandle::from("wf-1");

        let mut store = WorkflowStore::new_default("wf-1", "retry test");
        store
            .add_node(NodeType::DataProcess, Position::default())
            .unwrap();
        assert!(store.is_dirty());

        repo.fail_next_save();
        assert!(save_to(&mut store, &mut repo, &handle).is_err());
        // Nothing was cleared; state is intact for a retry.
        assert!(store.is_dirty());
        assert_eq!(store.graph().node_count(), 3);

        save_to(&mut store, &mut repo, &handle).unwrap();
        assert!(!store.is_dirty());
        assert_eq!(repo.load(&handle).unwrap().graph.node_count(), 3);
    }
}
