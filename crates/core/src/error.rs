//! Validation errors surfaced before any mutation reaches the repository.

use thiserror::Error;

/// Rejection from the validation layer, always naming the offending field(s).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("invalid date in {field}: expected YYYY-MM-DD")]
    InvalidDate { field: String },

    #[error("image file is required")]
    MissingImage,

    #[error("unsupported image type: {filename}")]
    UnsupportedImage { filename: String },
}
