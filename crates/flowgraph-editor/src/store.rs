//! [`WorkflowStore`]: the mutable core holding one canonical graph.
//!
//! All operations are synchronous and run to completion, validation
//! included, before returning. Check functions are the single source of
//! truth: each `can_*` predicate and its mutating counterpart call the
//! same check, so they can never disagree.

use indexmap::IndexMap;
use serde_json::Value;

use flowgraph_check::{validate, validate_for_run, Finding};
use flowgraph_core::{
    template, EdgeKey, FieldDescriptor, KeyGenerator, NodeKey, NodeType, Position, Presentation,
    WorkflowEdge, WorkflowGraph,
};

use crate::error::StoreError;
use crate::permission::Permission;

/// A partial node update. `None` fields are left untouched.
///
/// `key` renames the node; every edge referencing the old key is rewritten
/// in the same operation. `settings` is merged as a map union: new keys
/// overwrite, existing keys are retained.
#[derive(Debug, Clone, Default)]
pub struct NodeUpdate {
    pub key: Option<NodeKey>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub position: Option<Position>,
    pub presentation: Option<Presentation>,
    pub inputs: Option<Vec<FieldDescriptor>>,
    pub outputs: Option<Vec<FieldDescriptor>>,
    pub settings: Option<IndexMap<String, Value>>,
}

impl NodeUpdate {
    fn touches_config(&self) -> bool {
        self.inputs.is_some() || self.outputs.is_some() || self.settings.is_some()
    }
}

/// Outcome of a batch operation: disallowed items are skipped with their
/// reasons, allowed items are committed.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub applied: Vec<NodeKey>,
    pub skipped: Vec<(NodeKey, String)>,
}

impl BatchReport {
    /// Returns `true` when nothing was skipped.
    pub fn all_applied(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// The mutable workflow store.
#[derive(Debug)]
pub struct WorkflowStore {
    graph: WorkflowGraph,
    keys: KeyGenerator,
    dirty: bool,
    findings: Vec<Finding>,
    canvas_payload: Option<Value>,
}

impl WorkflowStore {
    /// Wraps an existing canonical graph and runs an initial strict
    /// validation pass. The store starts clean.
    pub fn from_graph(graph: WorkflowGraph) -> Self {
        let findings = validate(&graph);
        WorkflowStore {
            graph,
            keys: KeyGenerator::new(),
            dirty: false,
            findings,
            canvas_payload: None,
        }
    }

    /// A store over the default fresh-workflow template.
    pub fn new_default(id: impl Into<String>, name: impl Into<String>) -> Self {
        WorkflowStore::from_graph(WorkflowGraph::default_template(id, name))
    }

    // -----------------------------------------------------------------------
    // State access
    // -----------------------------------------------------------------------

    pub fn graph(&self) -> &WorkflowGraph {
        &self.graph
    }

    /// Findings from the most recent validation pass.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// `true` when in-memory state differs from the last successful save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The last-known editor-canvas payload, forwarded on save so
    /// presentation detail the canonical model does not track is not lost.
    pub fn canvas_payload(&self) -> Option<&Value> {
        self.canvas_payload.as_ref()
    }

    /// Stashes the latest editor-canvas payload.
    pub fn set_canvas_payload(&mut self, payload: Option<Value>) {
        self.canvas_payload = payload;
    }

    pub(crate) fn install_graph(&mut self, graph: WorkflowGraph, canvas_payload: Option<Value>) {
        self.graph = graph;
        self.canvas_payload = canvas_payload;
        self.keys = KeyGenerator::new();
        self.findings = validate(&self.graph);
    }

    pub(crate) fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Runs the strict validation pass and stores the findings.
    pub fn validate(&mut self) -> &[Finding] {
        self.findings = validate(&self.graph);
        &self.findings
    }

    /// Runs the lenient pass (connectivity checks skipped) and stores the
    /// findings. Used when test-running a single, possibly detached node.
    pub fn validate_for_run(&mut self) -> &[Finding] {
        self.findings = validate_for_run(&self.graph);
        &self.findings
    }

    fn revalidate(&mut self) {
        self.findings = validate(&self.graph);
    }

    // -----------------------------------------------------------------------
    // Checks (single source of truth for predicates and mutations)
    // -----------------------------------------------------------------------

    fn check_add_node(&self, node_type: NodeType) -> Result<(), StoreError> {
        let constraints = node_type.constraints();
        if let Some(max) = constraints.max_count {
            if self.graph.count_of_type(node_type) as u32 >= max {
                return Err(StoreError::MaxCountReached { node_type, max });
            }
        }
        Ok(())
    }

    fn check_delete_node(&self, key: &NodeKey) -> Result<(), StoreError> {
        let node = self
            .graph
            .node(key)
            .ok_or_else(|| StoreError::NodeNotFound { key: key.clone() })?;
        let node_type = node.node_type;
        let constraints = node_type.constraints();
        if !constraints.deletable {
            return Err(StoreError::NotDeletable { node_type });
        }
        let live = self.graph.count_of_type(node_type) as u32;
        if live <= constraints.min_count {
            return Err(StoreError::MinCountReached {
                node_type,
                min: constraints.min_count,
            });
        }
        Ok(())
    }

    fn check_copy_node(&self, key: &NodeKey) -> Result<(), StoreError> {
        let node = self
            .graph
            .node(key)
            .ok_or_else(|| StoreError::NodeNotFound { key: key.clone() })?;
        let node_type = node.node_type;
        if !node_type.constraints().copyable {
            return Err(StoreError::NotCopyable { node_type });
        }
        self.check_add_node(node_type)
    }

    fn check_add_edge(&self, source: &NodeKey, target: &NodeKey) -> Result<(), StoreError> {
        if !self.graph.contains_node(source) {
            return Err(StoreError::NodeNotFound {
                key: source.clone(),
            });
        }
        if !self.graph.contains_node(target) {
            return Err(StoreError::NodeNotFound {
                key: target.clone(),
            });
        }
        if source == target {
            return Err(StoreError::SelfLoop { key: source.clone() });
        }
        if self.graph.has_pair(source, target) {
            return Err(StoreError::DuplicateEdge {
                source: source.clone(),
                target: target.clone(),
            });
        }
        if flowgraph_check::would_cycle(&self.graph, source, target) {
            return Err(StoreError::WouldCycle {
                source: source.clone(),
                target: target.clone(),
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Predicates
    // -----------------------------------------------------------------------

    pub fn can_add_node(&self, node_type: NodeType) -> Permission {
        self.check_add_node(node_type).into()
    }

    pub fn can_delete_node(&self, key: &NodeKey) -> Permission {
        self.check_delete_node(key).into()
    }

    pub fn can_add_edge(&self, source: &NodeKey, target: &NodeKey) -> Permission {
        self.check_add_edge(source, target).into()
    }

    // -----------------------------------------------------------------------
    // Node mutations
    // -----------------------------------------------------------------------

    /// Adds a node of `node_type` at `position`, seeded from the type's
    /// default template.
    pub fn add_node(
        &mut self,
        node_type: NodeType,
        position: Position,
    ) -> Result<NodeKey, StoreError> {
        self.check_add_node(node_type)?;
        let key = self.keys.next_node_key(node_type, &self.graph);
        let node = template::instantiate(node_type, key.clone(), position);
        // Key freshness is the generator's contract.
        let _ = self.graph.push_node(node);
        self.dirty = true;
        self.revalidate();
        tracing::debug!(%key, node_type = %node_type, "node added");
        Ok(key)
    }

    /// Applies a partial update to one node.
    ///
    /// A key change is an atomic rename: the node and every referencing
    /// edge are rewritten together. Re-validates only when the config
    /// block changed.
    pub fn update_node(&mut self, key: &NodeKey, update: NodeUpdate) -> Result<(), StoreError> {
        if !self.graph.contains_node(key) {
            return Err(StoreError::NodeNotFound { key: key.clone() });
        }

        let mut current = key.clone();
        if let Some(new_key) = &update.key {
            if new_key != key {
                if self.graph.contains_node(new_key) {
                    return Err(StoreError::KeyTaken {
                        key: new_key.clone(),
                    });
                }
                // Existence and collision were checked above.
                let _ = self.graph.rename_node(key, new_key.clone());
                tracing::debug!(old = %key, new = %new_key, "node renamed");
                current = new_key.clone();
            }
        }

        let touches_config = update.touches_config();
        let node = self
            .graph
            .node_mut(&current)
            .ok_or_else(|| StoreError::NodeNotFound { key: current.clone() })?;
        if let Some(name) = update.name {
            node.name = name;
        }
        if let Some(description) = update.description {
            node.description = Some(description);
        }
        if let Some(position) = update.position {
            node.position = position;
        }
        if let Some(presentation) = update.presentation {
            node.presentation = Some(presentation);
        }
        if let Some(inputs) = update.inputs {
            node.config.inputs = inputs;
        }
        if let Some(outputs) = update.outputs {
            node.config.outputs = outputs;
        }
        if let Some(settings) = update.settings {
            // Map union: new keys overwrite, others are retained.
            for (name, value) in settings {
                node.config.settings.insert(name, value);
            }
        }

        self.dirty = true;
        if touches_config {
            self.revalidate();
        }
        Ok(())
    }

    /// Deletes a node and every incident edge.
    pub fn delete_node(&mut self, key: &NodeKey) -> Result<(), StoreError> {
        self.check_delete_node(key)?;
        // The check proved existence.
        if let Ok((_, cascaded)) = self.graph.remove_node(key) {
            tracing::debug!(%key, cascaded, "node deleted");
        }
        self.dirty = true;
        self.revalidate();
        Ok(())
    }

    /// Duplicates a node with a fresh key, a copy-suffixed name, and an
    /// offset position. Incident edges are not copied.
    pub fn copy_node(
        &mut self,
        key: &NodeKey,
        offset: (f64, f64),
    ) -> Result<NodeKey, StoreError> {
        self.check_copy_node(key)?;
        let source = self
            .graph
            .node(key)
            .ok_or_else(|| StoreError::NodeNotFound { key: key.clone() })?;

        let new_key = {
            let node_type = source.node_type;
            // Borrow of `source` ends before the generator needs the graph.
            let source = source.clone();
            let new_key = self.keys.next_node_key(node_type, &self.graph);
            let mut copy = source.deep_clone_as(new_key.clone());
            copy.name = format!("{} (copy)", source.name);
            copy.position = source.position.offset_by(offset.0, offset.1);
            let _ = self.graph.push_node(copy);
            new_key
        };

        self.dirty = true;
        self.revalidate();
        tracing::debug!(source = %key, copy = %new_key, "node copied");
        Ok(new_key)
    }

    // -----------------------------------------------------------------------
    // Edge mutations
    // -----------------------------------------------------------------------

    /// Connects two existing nodes.
    pub fn add_edge(&mut self, source: &NodeKey, target: &NodeKey) -> Result<EdgeKey, StoreError> {
        self.check_add_edge(source, target)?;
        let edge = WorkflowEdge::between(source.clone(), target.clone());
        let key = edge.key.clone();
        // Pair uniqueness was checked, so the derived key is fresh.
        let _ = self.graph.push_edge(edge);
        self.dirty = true;
        self.revalidate();
        tracing::debug!(%source, %target, "edge added");
        Ok(key)
    }

    /// Removes an edge. Edges carry no minimum-count constraint, so the
    /// only failure is a missing key.
    pub fn delete_edge(&mut self, key: &EdgeKey) -> Result<(), StoreError> {
        self.graph
            .remove_edge(key)
            .map_err(|_| StoreError::EdgeNotFound { key: key.clone() })?;
        self.dirty = true;
        self.revalidate();
        tracing::debug!(%key, "edge deleted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Batch operations: per-item skip with an itemized report
    // -----------------------------------------------------------------------

    /// Deletes several nodes. Disallowed items are skipped with their
    /// reasons; allowed items are committed.
    pub fn delete_nodes(&mut self, keys: &[NodeKey]) -> BatchReport {
        let mut report = BatchReport::default();
        for key in keys {
            match self.delete_node(key) {
                Ok(()) => report.applied.push(key.clone()),
                Err(err) => report.skipped.push((key.clone(), err.to_string())),
            }
        }
        report
    }

    /// Applies several node updates with the same per-item semantics.
    pub fn update_nodes(&mut self, updates: Vec<(NodeKey, NodeUpdate)>) -> BatchReport {
        let mut report = BatchReport::default();
        for (key, update) in updates {
            match self.update_node(&key, update) {
                Ok(()) => report.applied.push(key),
                Err(err) => report.skipped.push((key, err.to_string())),
            }
        }
        report
    }
}
