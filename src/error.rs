//! Error taxonomy shared by every vecdb operation.
//!
//! Each variant maps to a stable [`code`](VecDbError::code) so a transport
//! layer can pick its own status reporting without matching on messages.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VecDbError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("collection id '{0}' already exists")]
    DuplicateId(String),

    #[error("invalid collection id '{0}': expected 1-64 characters of [A-Za-z0-9_-]")]
    InvalidId(String),

    #[error("dimension mismatch: expected {expected}, got {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("cannot compute similarity against a zero-norm vector")]
    DegenerateVector,

    #[error("corrupt data in {path:?}: {reason}")]
    CorruptData { path: PathBuf, reason: String },

    #[error("storage directory {path:?} unavailable: {source}")]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("collection '{id}' is leased by another process or was not shut down cleanly ({path:?})")]
    LeaseHeld { id: String, path: PathBuf },

    #[error("embedding provider failed: {0}")]
    Embedding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VecDbError {
    pub(crate) fn collection_not_found(id: &str) -> Self {
        VecDbError::NotFound(format!("collection '{}'", id))
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        VecDbError::CorruptData { path: path.into(), reason: reason.to_string() }
    }

    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            VecDbError::NotFound(_) => "not_found",
            VecDbError::DuplicateId(_) => "duplicate_id",
            VecDbError::InvalidId(_) => "invalid_id",
            VecDbError::DimensionMismatch { .. } => "dimension_mismatch",
            VecDbError::DegenerateVector => "degenerate_vector",
            VecDbError::CorruptData { .. } => "corrupt_data",
            VecDbError::DirectoryUnavailable { .. } => "directory_unavailable",
            VecDbError::LeaseHeld { .. } => "lease_held",
            VecDbError::Embedding(_) => "embedding_failed",
            VecDbError::Io(_) => "io",
        }
    }

    /// Only a missing storage directory stops the service; everything else is
    /// reported back to the caller.
    pub fn is_fatal(&self) -> bool {
        matches!(self, VecDbError::DirectoryUnavailable { .. })
    }
}

pub type Result<T> = std::result::Result<T, VecDbError>;
