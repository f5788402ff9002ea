//! Two-variant predicate result for the UI's pre-checks.
//!
//! A deliberate replacement for the "boolean or reason string" idiom: a
//! denial always carries its reason, and a caller cannot accidentally
//! treat the reason as truthiness.

use crate::error::StoreError;

/// Whether an operation would be allowed right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Permission {
    Allowed,
    Denied(String),
}

impl Permission {
    /// Returns `true` for `Allowed`.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Permission::Allowed)
    }

    /// The denial reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Permission::Allowed => None,
            Permission::Denied(reason) => Some(reason),
        }
    }
}

impl From<Result<(), StoreError>> for Permission {
    fn from(result: Result<(), StoreError>) -> Self {
        match result {
            Ok(()) => Permission::Allowed,
            Err(err) => Permission::Denied(err.to_string()),
        }
    }
}
