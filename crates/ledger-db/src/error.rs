//! # Database Error Types
//!
//! The store's error taxonomy.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError (ledger-core)      sqlx::Error (SQLite)               │
//! │       │                                   │                             │
//! │       │                                   │ classify constraint message │
//! │       ▼                                   ▼                             │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │ DbError (this module)                                           │   │
//! │  │   NotFound            - referenced row missing                  │   │
//! │  │   UniqueViolation     - tax_id / bank account / unit pair taken │   │
//! │  │   ConstraintViolation - quantity, price, required fields        │   │
//! │  │   ReferentialBlock    - delete refused, dependents exist        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (ledger-api) ← HTTP status + JSON body                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every write runs in one transaction, so any of these errors means
//! nothing was written.

use ledger_core::ValidationError;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// A referenced row does not exist.
    ///
    /// ## When This Occurs
    /// - Unit registered for a missing material
    /// - Receipt naming a missing supplier, material or unit pair
    /// - Update/delete of an id that was never issued or already removed
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique key already taken.
    ///
    /// ## When This Occurs
    /// - Second supplier with the same tax_id or bank_account_number
    /// - Registering the same (material, unit) pair twice
    /// - Renaming a unit onto a name the material already has
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Row values break a CHECK / NOT NULL rule.
    ///
    /// ## When This Occurs
    /// - quantity <= 0
    /// - unit_price < 0
    /// - required field missing or wider than its column
    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// Delete refused because dependent rows exist (restrict policy).
    #[error("Cannot delete {entity} {id}: referenced by {dependents} receipt(s)")]
    ReferentialBlock {
        entity: String,
        id: String,
        dependents: i64,
    },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed for a reason outside the taxonomy.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a ReferentialBlock error.
    pub fn blocked(entity: impl Into<String>, id: impl ToString, dependents: i64) -> Self {
        DbError::ReferentialBlock {
            entity: entity.into(),
            id: id.to_string(),
            dependents,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::UniqueViolation { .. })
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DbError::ConstraintViolation { .. })
    }

    pub fn is_referential_block(&self) -> bool {
        matches!(self, DbError::ReferentialBlock { .. })
    }
}

impl From<ValidationError> for DbError {
    fn from(err: ValidationError) -> Self {
        DbError::ConstraintViolation {
            message: err.to_string(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// The repositories pre-check every rule inside their transaction, so these
/// mappings only fire when a concurrent writer slipped in between the check
/// and the write.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound            → DbError::NotFound
/// "UNIQUE constraint failed: t.col"   → DbError::UniqueViolation { field: "t.col" }
/// "CHECK constraint failed"           → DbError::ConstraintViolation
/// "NOT NULL constraint failed"        → DbError::ConstraintViolation
/// "FOREIGN KEY constraint failed"     → DbError::ConstraintViolation
/// sqlx::Error::PoolTimedOut           → DbError::PoolExhausted
/// Other                               → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if let Some(field) = msg.split("UNIQUE constraint failed: ").nth(1) {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("CHECK constraint failed")
                    || msg.contains("NOT NULL constraint failed")
                    || msg.contains("FOREIGN KEY constraint failed")
                {
                    DbError::ConstraintViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_constraint_violation() {
        let err: DbError = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into();

        assert!(err.is_constraint_violation());
        assert_eq!(err.to_string(), "Constraint violation: quantity must be positive");
    }

    #[test]
    fn test_blocked_message() {
        let err = DbError::blocked("Material", 5, 2);
        assert!(err.is_referential_block());
        assert_eq!(err.to_string(), "Cannot delete Material 5: referenced by 2 receipt(s)");
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(err.is_not_found());
    }
}
