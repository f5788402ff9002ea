//! The mutable workflow store: the component every external collaborator
//! talks to.
//!
//! [`WorkflowStore`] owns one canonical graph plus derived state (dirty
//! flag, last validation findings). Every mutation consults the constraint
//! registry before touching the graph and re-validates after structural
//! changes. Expected rule violations come back as [`StoreError`] values,
//! never panics; predicate helpers ([`Permission`]) run the exact same
//! checks so the UI can pre-disable actions without duplicating mutation
//! logic.
//!
//! The only I/O boundary is `session`: load/save against a
//! `flowgraph_storage::WorkflowRepository`.

pub mod error;
pub mod permission;
pub mod session;
pub mod store;

pub use error::StoreError;
pub use permission::Permission;
pub use session::{load_from, save_to, LoadOutcome};
pub use store::{BatchReport, NodeUpdate, WorkflowStore};
