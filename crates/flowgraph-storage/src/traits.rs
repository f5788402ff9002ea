//! The [`WorkflowRepository`] trait: the narrow load/save contract between
//! the editor store and whatever actually persists workflows.
//!
//! The trait is synchronous for simplicity in the current single-threaded
//! design; an async host wraps calls at its own boundary. The core never
//! persists anything itself and never swallows a backend failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use flowgraph_core::WorkflowGraph;

use crate::convert::DecodeIssue;
use crate::error::StorageError;

/// Opaque handle identifying one stored workflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphHandle(pub String);

impl From<&str> for GraphHandle {
    fn from(s: &str) -> Self {
        GraphHandle(s.to_string())
    }
}

impl std::fmt::Display for GraphHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The result of a successful load.
#[derive(Debug, Clone)]
pub struct LoadedWorkflow {
    /// The canonical graph.
    pub graph: WorkflowGraph,
    /// The raw editor-canvas payload as last saved, if any. Carried so
    /// presentation detail the canonical model does not track survives a
    /// load/save cycle.
    pub canvas_payload: Option<Value>,
    /// Non-fatal decode problems encountered while reading stored data.
    pub issues: Vec<DecodeIssue>,
}

/// The persistence contract consumed by the editor store.
pub trait WorkflowRepository {
    /// Loads a workflow. Fails with a retrievable error when the handle is
    /// unknown or the backing store is unreachable.
    fn load(&self, handle: &GraphHandle) -> Result<LoadedWorkflow, StorageError>;

    /// Persists a workflow. On failure the caller's in-memory state must be
    /// left untouched so the save can be retried without data loss.
    fn save(
        &mut self,
        handle: &GraphHandle,
        graph: &WorkflowGraph,
        canvas_payload: Option<&Value>,
    ) -> Result<(), StorageError>;
}
