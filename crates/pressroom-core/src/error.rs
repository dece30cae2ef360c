//! Validation errors for inbound field checks.

use thiserror::Error;

/// Errors produced by the field checks in [`crate::validation`].
///
/// These cover only the thin checks this core keeps; full request-payload
/// validation is the transport layer's concern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Required(&'static str),

    #[error("{field} exceeds maximum length of {max} characters (got {len})")]
    TooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("{0} update carries no fields")]
    EmptyPatch(&'static str),
}
