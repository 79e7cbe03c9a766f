//! Storage Data Types
//!
//! Error taxonomy, patch operations and query filters shared by every
//! `PartitionedTable` implementation.

use serde_json::Value;
use thiserror::Error;

/// A stored item. Always a JSON object carrying a string `id`.
pub type Document = Value;

/// Result type for store primitives.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by the partitioned store.
///
/// `NotFound` and `Conflict` are distinguishable outcomes the callers branch
/// on; everything else is treated as an internal failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("item {id} not found in partition {partition_key}")]
    NotFound { id: String, partition_key: String },

    #[error("item {id} already exists in partition {partition_key}")]
    Conflict { id: String, partition_key: String },

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("invalid patch: {0}")]
    InvalidPatch(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Transient backend failure (network, throttling, unexpected status).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// A single server-side mutation applied by `PartitionedTable::patch`.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchOperation {
    /// Adds `value` to the integer field at the JSON pointer `path`.
    /// An absent field is created with `value`.
    Increment { path: String, value: i64 },
}

impl PatchOperation {
    pub fn increment(path: &str, value: i64) -> Self {
        PatchOperation::Increment {
            path: path.to_string(),
            value,
        }
    }

    /// Applies the operation to `document` in place.
    pub fn apply(&self, document: &mut Document) -> StoreResult<()> {
        match self {
            PatchOperation::Increment { path, value } => {
                let Some(field) = path.strip_prefix('/') else {
                    return Err(StoreError::InvalidPatch(format!(
                        "path must start with '/': {}",
                        path
                    )));
                };

                // Only the parent has to exist; a missing leaf is created.
                let (parent_path, leaf) = match field.rsplit_once('/') {
                    Some((parent, leaf)) => (format!("/{}", parent), leaf),
                    None => (String::new(), field),
                };

                let parent = document
                    .pointer_mut(&parent_path)
                    .and_then(Value::as_object_mut)
                    .ok_or_else(|| {
                        StoreError::InvalidPatch(format!("no object at {}", parent_path))
                    })?;

                let next = match parent.get(leaf) {
                    None => *value,
                    Some(current) => current
                        .as_i64()
                        .ok_or_else(|| {
                            StoreError::InvalidPatch(format!("{} is not an integer", path))
                        })?
                        .checked_add(*value)
                        .ok_or_else(|| StoreError::InvalidPatch(format!("{} overflowed", path)))?,
                };

                parent.insert(leaf.to_string(), Value::from(next));
                Ok(())
            }
        }
    }
}

/// Predicate evaluated by `PartitionedTable::count`.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    FieldEquals { field: String, value: Value },
}

impl Filter {
    pub fn field_equals(field: &str, value: impl Into<Value>) -> Self {
        Filter::FieldEquals {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::FieldEquals { field, value } => document.get(field) == Some(value),
        }
    }
}
