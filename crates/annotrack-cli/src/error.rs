//! Error types for the Annotrack CLI
//!
//! Every failure is reported as a single line whose prefix names its
//! category, e.g. `validation error: name must not be empty`.

use annotrack_core::db::DbError;
use annotrack_core::{Classify, ErrorKind};
use thiserror::Error;

use crate::drawing::DrawingError;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// A command or query was rejected or failed
    #[error("{message}")]
    Operation { kind: ErrorKind, message: String },

    /// Opening or migrating the database failed
    #[error("{0}")]
    Database(#[from] DbError),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables or .env file.")]
    Config(String),

    /// The drag gesture could not be translated to image pixels
    #[error("{0}")]
    Drawing(#[from] DrawingError),

    /// JSON rendering failed
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Wrap a classified command/query error
    pub fn operation<E: Classify>(error: E) -> Self {
        Self::Operation {
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Operation { kind, .. } => *kind,
            Self::Drawing(_) => ErrorKind::Validation,
            Self::Database(_) | Self::Config(_) | Self::Json(_) => ErrorKind::Store,
        }
    }

    /// The line printed to stderr
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.kind(), self)
    }
}
