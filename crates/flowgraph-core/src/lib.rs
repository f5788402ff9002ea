//! Canonical data model for workflow graphs.
//!
//! A workflow is a directed graph of typed nodes connected by edges. This
//! crate owns the single in-memory representation of that graph, independent
//! of the persisted wire shape and the editor-canvas shape (both live in
//! `flowgraph-storage`). Mutation rules and validation live in
//! `flowgraph-editor` and `flowgraph-check`; this crate provides the data
//! types, the per-type constraint registry, default node templates, and
//! collision-free key generation.

pub mod edge;
pub mod error;
pub mod field;
pub mod graph;
pub mod id;
pub mod node;
pub mod registry;
pub mod template;

// Re-export commonly used types
pub use edge::WorkflowEdge;
pub use error::CoreError;
pub use field::{FieldDescriptor, FieldType};
pub use graph::{Viewport, WorkflowGraph};
pub use id::{EdgeKey, KeyGenerator, NodeKey};
pub use node::{NodeConfig, NodeType, Position, Presentation, WorkflowNode};
pub use registry::NodeConstraints;
