//! Error classification shared by every command and query
//!
//! Each handler has its own `thiserror` enum. Front-ends do not match on
//! those individually; they ask for the [`ErrorKind`] instead.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad category of a failed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input rejected before touching the store
    Validation,
    /// Parent record missing
    Reference,
    /// Target record missing
    NotFound,
    /// Store constraint conflict; the unit of work was rolled back
    Integrity,
    /// Any other store failure
    Store,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation error",
            ErrorKind::Reference => "reference error",
            ErrorKind::NotFound => "not found",
            ErrorKind::Integrity => "integrity error",
            ErrorKind::Store => "store error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every command/query error type
pub trait Classify: std::error::Error {
    fn kind(&self) -> ErrorKind;
}

/// Classify a raw store error that reached a handler unmapped
pub(crate) fn classify_sqlx(error: &sqlx::Error) -> ErrorKind {
    use crate::features::shared::error_helpers::{is_foreign_key_violation, is_integrity_violation};

    if is_foreign_key_violation(error) {
        ErrorKind::Reference
    } else if is_integrity_violation(error) {
        ErrorKind::Integrity
    } else if matches!(error, sqlx::Error::RowNotFound) {
        ErrorKind::NotFound
    } else {
        ErrorKind::Store
    }
}
