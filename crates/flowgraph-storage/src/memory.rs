//! In-memory repository backend.
//!
//! The reference implementation of [`WorkflowRepository`]: workflows are
//! stored as wire-format records, so every load and save exercises the
//! same adapters a real backend would. A fail-next-save switch supports
//! testing the store's retry semantics.

use std::collections::HashMap;

use serde_json::Value;

use flowgraph_core::WorkflowGraph;

use crate::convert::{canonical_to_wire, wire_to_canonical};
use crate::error::StorageError;
use crate::traits::{GraphHandle, LoadedWorkflow, WorkflowRepository};
use crate::wire::WorkflowConfig;

#[derive(Debug, Clone)]
struct StoredRecord {
    config: WorkflowConfig,
    canvas_payload: Option<Value>,
}

/// A `HashMap`-backed repository.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    records: HashMap<GraphHandle, StoredRecord>,
    fail_next_save: bool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        InMemoryRepository::default()
    }

    /// Makes the next `save` call fail with a backend error.
    pub fn fail_next_save(&mut self) {
        self.fail_next_save = true;
    }

    /// Number of stored workflows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Direct access to a stored wire record, mainly for tests.
    pub fn stored_config(&self, handle: &GraphHandle) -> Option<&WorkflowConfig> {
        self.records.get(handle).map(|r| &r.config)
    }
}

impl WorkflowRepository for InMemoryRepository {
    fn load(&self, handle: &GraphHandle) -> Result<LoadedWorkflow, StorageError> {
        let record = self
            .records
            .get(handle)
            .ok_or_else(|| StorageError::HandleNotFound {
                handle: handle.0.clone(),
            })?;
        let (graph, issues) = wire_to_canonical(&record.config);
        Ok(LoadedWorkflow {
            graph,
            canvas_payload: record.canvas_payload.clone(),
            issues,
        })
    }

    fn save(
        &mut self,
        handle: &GraphHandle,
        graph: &WorkflowGraph,
        canvas_payload: Option<&Value>,
    ) -> Result<(), StorageError> {
        if self.fail_next_save {
            self.fail_next_save = false;
            return Err(StorageError::Backend {
                reason: "simulated save failure".into(),
            });
        }
        let base = self.records.get(handle).map(|r| r.config.clone());
        let config = canonical_to_wire(graph, base.as_ref())?;
        self.records.insert(
            handle.clone(),
            StoredRecord {
                config,
                canvas_payload: canvas_payload.cloned(),
            },
        );
        Ok(())
    }
}
