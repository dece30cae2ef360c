//! Error taxonomy for service operations.

use pressroom_core::ValidationError;
use pressroom_store::StoreError;
use thiserror::Error;

/// Errors surfaced by [`crate::ContentService`] operations.
///
/// `Forbidden` and `NotFound` are deliberately distinct: probing a record
/// that exists but is not yours yields `Forbidden`, while an absent record
/// yields `NotFound`. Policy denial itself never travels as an error; only
/// the service translates a `false` decision into `Forbidden`.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Authorization denied.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// No record with this id.
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed input fields.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Record store failure, propagated unchanged. Not retried.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn is_forbidden(&self) -> bool {
        matches!(self, ServiceError::Forbidden(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Validation(_))
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
