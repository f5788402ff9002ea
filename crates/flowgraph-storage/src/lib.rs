//! Serialized shapes of a workflow graph and the persistence contract.
//!
//! Three representations of the same graph exist:
//! - the **canonical** format (`flowgraph-core`), the single in-memory model;
//! - the **wire** format ([`wire::WorkflowConfig`]), the persisted/transport
//!   shape, where each node carries its outgoing-neighbor key list and
//!   presentation detail rides in a string-encoded side payload;
//! - the **editor-canvas** format ([`canvas::CanvasGraph`]), where edges are
//!   attached to their source node instead of a flat list.
//!
//! [`convert`] holds the pure adapters between them. [`traits`] defines the
//! narrow load/save contract the editor store talks to; [`memory`] is the
//! in-memory reference backend.

pub mod canvas;
pub mod convert;
pub mod error;
pub mod memory;
pub mod traits;
pub mod wire;

pub use canvas::CanvasGraph;
pub use convert::{
    canonical_to_canvas, canonical_to_wire, canvas_to_canonical, wire_to_canonical, DecodeIssue,
};
pub use error::StorageError;
pub use memory::InMemoryRepository;
pub use traits::{GraphHandle, LoadedWorkflow, WorkflowRepository};
pub use wire::{NodeDesign, RawPayload, UiDesign, WorkflowConfig};
