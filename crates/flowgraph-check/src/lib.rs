//! Structural validation for workflow graphs.
//!
//! The validator is a pure function over a graph snapshot. It never mutates
//! and never fails: the output is an ordered list of [`Finding`]s, each
//! tagged with a [`FindingKind`] and, where applicable, the offending node
//! or edge key. Presence of any finding means the graph is not runnable;
//! it does not block further editing.
//!
//! Two modes exist: [`validate`] runs every check, [`validate_for_run`]
//! skips the connectivity checks so a detached node can still be tested
//! interactively while field and cycle checks stay in force.

pub mod cycle;
pub mod finding;
pub mod validate;

pub use cycle::{find_cycle, would_cycle};
pub use finding::{Finding, FindingKind};
pub use validate::{validate, validate_for_run};
