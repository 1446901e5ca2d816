//! # Record Store Errors

use thiserror::Error;

use crate::schema::{EntityKind, ValidationError};
use crate::storage::StorageError;

/// Result type for record store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Candidate violates a field constraint; raised before any I/O
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// No live record carries the requested id
    #[error("{entity} with id {id} not found")]
    NotFound { entity: EntityKind, id: u64 },

    /// Corrupt data or I/O failure underneath
    #[error("{0}")]
    Storage(#[from] StorageError),
}

impl StoreError {
    /// Returns true for the not-found case
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
