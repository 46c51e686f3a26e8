use thiserror::Error;

use crate::field::FieldType;

#[derive(Debug, Error)]
pub enum CrudError {
    /// A field value was read through a conversion that does not match the
    /// field's declared type
    #[error("field '{field}' has type '{actual}', expected '{expected}'")]
    FieldMismatch {
        field: String,
        actual: FieldType,
        expected: &'static str,
    },

    /// The field's declared type matched, but the runtime value could not be
    /// represented as the requested type
    #[error("field '{field}' value is not castable to {expected}")]
    ValueCast {
        field: String,
        expected: &'static str,
    },

    /// A join clause or select column failed validation
    #[error("invalid join specification: {0}")]
    InvalidJoin(String),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for crudkit operations
pub type Result<T> = core::result::Result<T, CrudError>;
