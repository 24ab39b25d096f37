//! # Error Types
//!
//! Domain error types for ledger-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ledger-core (this file)                                               │
//! │  └── ValidationError  - Input rejected before any write                │
//! │                                                                         │
//! │  ledger-db                                                             │
//! │  └── DbError          - NotFound / UniqueViolation /                   │
//! │                         ConstraintViolation / ReferentialBlock         │
//! │                                                                         │
//! │  ledger-api                                                            │
//! │  └── ApiError         - HTTP status + JSON body                        │
//! │                                                                         │
//! │  Flow: ValidationError → DbError::ConstraintViolation → ApiError       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Input validation errors.
///
/// Raised by the [`crate::validation`] functions and by decimal parsing.
/// The store surfaces every one of them as a constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value exceeds the column width.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value cannot be represented in the stored integer range.
    #[error("{field} is out of range")]
    OutOfRange { field: String },

    /// Invalid format (e.g. malformed decimal).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::MustNotBeNegative { field }
            | ValidationError::OutOfRange { field }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}
