// Error types for the task store

use std::fmt;
use thiserror::Error;

/// Input field a validation message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Text,
    Time,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Text => write!(f, "text"),
            Field::Time => write!(f, "time"),
        }
    }
}

/// A single rejected input field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Rejected user input, one entry per offending field
///
/// Adapters show each message inline next to its field. State is never
/// mutated when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid input: {}", summary(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(field: Field, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                field,
                message: message.into(),
            }],
        }
    }

    /// Message for a given field, if that field was rejected
    pub fn message_for(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failures of a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to acquire storage lock: {0}")]
    Lock(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Failed to encode tasks: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors returned by task store mutations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("No task ids left after {0}")]
    IdsExhausted(i64),
}

impl StoreError {
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            StoreError::Validation(e) => Some(e),
            StoreError::Storage(_) | StoreError::IdsExhausted(_) => None,
        }
    }
}
