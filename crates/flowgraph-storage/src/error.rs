//! Storage error types.

use thiserror::Error;

/// Errors produced by persistence backends and payload decoding.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested workflow handle does not exist in the backing store.
    #[error("workflow not found: '{handle}'")]
    HandleNotFound { handle: String },

    /// The backing store rejected or failed the operation.
    #[error("storage backend failure: {reason}")]
    Backend { reason: String },

    /// A serialized payload could not be decoded.
    #[error("payload decode failure in {context}: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
