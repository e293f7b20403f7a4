//! Database error handling utilities
//!
//! Classifies constraint violations raised by the store so that command
//! handlers can turn them into their own error variants.
//!
//! # Examples
//!
//! ```rust,ignore
//! use annotrack_core::features::shared::error_helpers::map_constraint_violation;
//!
//! sqlx::query("INSERT INTO runs ...")
//!     .execute(&mut *tx)
//!     .await
//!     .map_err(|e| map_constraint_violation(
//!         e,
//!         |e| CreateRunError::Integrity(e.to_string()),
//!         CreateRunError::ExperimentNotFound(experiment_id),
//!         CreateRunError::Database,
//!     ))?;
//! ```

use sqlx::error::ErrorKind;
use sqlx::Error as SqlxError;

/// Result of checking for a database constraint violation
#[derive(Debug)]
pub enum ConstraintViolation {
    /// A unique or primary key constraint was violated
    UniqueViolation(SqlxError),
    /// A foreign key constraint was violated
    ForeignKeyViolation,
    /// A CHECK or NOT NULL constraint was violated
    CheckViolation(SqlxError),
    /// No constraint violation - some other error occurred
    Other(SqlxError),
}

/// Check the type of database constraint violation
pub fn check_constraint_violation(error: SqlxError) -> ConstraintViolation {
    if let SqlxError::Database(ref db_err) = error {
        if db_err.is_foreign_key_violation() {
            return ConstraintViolation::ForeignKeyViolation;
        }
        if db_err.is_unique_violation() {
            return ConstraintViolation::UniqueViolation(error);
        }
        if db_err.is_check_violation() || matches!(db_err.kind(), ErrorKind::NotNullViolation) {
            return ConstraintViolation::CheckViolation(error);
        }
    }
    ConstraintViolation::Other(error)
}

/// Check if the error is a foreign key violation
pub fn is_foreign_key_violation(error: &SqlxError) -> bool {
    if let SqlxError::Database(db_err) = error {
        return db_err.is_foreign_key_violation();
    }
    false
}

/// Check if the error is any integrity violation other than a foreign key
pub fn is_integrity_violation(error: &SqlxError) -> bool {
    if let SqlxError::Database(db_err) = error {
        return db_err.is_unique_violation()
            || db_err.is_check_violation()
            || matches!(db_err.kind(), ErrorKind::NotNullViolation);
    }
    false
}

/// Map store errors onto a command's error type
///
/// # Arguments
/// * `error` - The sqlx error to check
/// * `integrity_error` - Builds the error for unique/check violations
/// * `fk_error` - Error to return on foreign key violation
/// * `default_wrapper` - Function to wrap other errors
pub fn map_constraint_violation<E, I, F>(
    error: SqlxError,
    integrity_error: I,
    fk_error: E,
    default_wrapper: F,
) -> E
where
    I: FnOnce(SqlxError) -> E,
    F: FnOnce(SqlxError) -> E,
{
    match check_constraint_violation(error) {
        ConstraintViolation::ForeignKeyViolation => fk_error,
        ConstraintViolation::UniqueViolation(e) | ConstraintViolation::CheckViolation(e) => {
            integrity_error(e)
        },
        ConstraintViolation::Other(e) => default_wrapper(e),
    }
}
