//! Typed error enum for the service layer.

use herbarium_core::ValidationError;
use herbarium_storage::StorageError;
use thiserror::Error;

/// Service-layer error unifying validation and storage failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input rejected before any mutation reached the repository.
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),

    /// Storage operation failed (DB, not found, conflict, artifact IO).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),
}

impl ServiceError {
    /// Whether this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_not_found())
    }

    /// Whether this error represents a uniqueness/pair conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_conflict())
    }
}
