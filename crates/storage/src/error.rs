//! Typed error enum for the storage layer.
//!
//! Callers match on specific failure modes (not found, conflict, database
//! failure) instead of downcasting opaque boxes.

use thiserror::Error;

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Row not found for expected-present entity.
    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// Unique constraint violation or mismatched bilingual pair.
    #[error("conflict: {0}")]
    Conflict(String),

    /// SQL / connection failure.
    #[error("database error: {0}")]
    Database(#[source] rusqlite::Error),

    /// Connection mutex poisoned by a panicking writer.
    #[error("database lock poisoned")]
    Poisoned,

    /// Artifact missing from the image store.
    #[error("artifact not found: {0}")]
    ArtifactNotFound(String),

    /// Filesystem failure in the image store.
    #[error("artifact store error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Whether this error is a uniqueness/pair conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Whether this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::ArtifactNotFound(_))
    }
}

/// Custom `From<rusqlite::Error>` — NOT blanket `#[from]`.
///
/// Constraint violations become `Conflict` so callers can report them as
/// such; everything else is a `Database` failure.
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(ffi_err, msg)
                if ffi_err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::Conflict(msg.clone().unwrap_or_else(|| ffi_err.to_string()))
            }
            _ => Self::Database(err),
        }
    }
}
