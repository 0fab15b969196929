//! Listing error types.

use thiserror::Error;

/// Errors raised by the listing kernel.
///
/// Page arithmetic failures are caller bugs and fail fast. Registration
/// failures happen at setup time and leave the registry unchanged. Bad
/// per-field request input never reaches this type; it is reported through
/// [`crate::filter::FieldStatus`] instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListingError {
    #[error("page size must be positive")]
    InvalidPageSize,

    #[error("maximum button count must be positive")]
    InvalidButtonCount,

    #[error("unsupported column kind '{kind}' for field '{field}'")]
    UnsupportedKind { field: String, kind: String },

    #[error("filter field '{0}' is already registered")]
    DuplicateField(String),

    #[error("filter field '{0}' is not registered")]
    UnknownField(String),

    #[error("table column '{0}' is already registered")]
    DuplicateColumn(String),

    #[error("projection '{0}' is already defined on this query plan")]
    DuplicateProjection(String),
}

/// Result type alias using ListingError.
pub type ListingResult<T> = Result<T, ListingError>;
