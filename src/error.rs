//! Error type shared by every operation.
//!
//! An error aborts the single operation invocation that raised it. Nothing is
//! retried and there are no partial results.

use thiserror::Error;

/// Errors returned by record operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Input is not a collection, record or grid where one is required
    #[error("Shape error: {0}")]
    Shape(String),

    #[error("Field '{field}' not found")]
    FieldNotFound { field: String },

    /// An intermediate path segment landed on something other than a record
    #[error("Field '{segment}' is not a record")]
    NotARecord { segment: String },

    /// Wrong arity, type or value of an operation argument
    #[error("Invalid arguments: {0}")]
    Argument(String),

    /// A `totable` cell failed to parse under its column's inferred kind
    #[error("Parse error at row {row}, column '{column}': '{value}' is not a valid {kind}")]
    Parse {
        row: usize,
        column: String,
        value: String,
        kind: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Config error: {0}")]
    Config(String),

    /// Raised by the template evaluator collaborator
    #[error("Template error: {0}")]
    Template(String),
}

impl Error {
    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        Error::Shape(msg.into())
    }

    pub(crate) fn argument(msg: impl Into<String>) -> Self {
        Error::Argument(msg.into())
    }

    pub(crate) fn field_not_found(field: impl Into<String>) -> Self {
        Error::FieldNotFound {
            field: field.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
