//! "Next id" helpers
//!
//! The value is a display hint for forms. Every table uses AUTOINCREMENT, so
//! the id the next insert receives is the table's `sqlite_sequence` entry
//! plus one, or `1` before the first insert. Ids of deleted rows are never
//! reused. The hint reserves nothing.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{classify_sqlx, Classify, ErrorKind};

/// Table whose next identity value is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSequence {
    Experiments,
    Runs,
    Images,
}

impl IdSequence {
    fn table(&self) -> &'static str {
        match self {
            IdSequence::Experiments => "experiments",
            IdSequence::Runs => "runs",
            IdSequence::Images => "images",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextIdResponse {
    pub next_id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum NextIdError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Classify for NextIdError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Database(e) => classify_sqlx(e),
        }
    }
}

pub async fn next_id(pool: &SqlitePool, sequence: IdSequence) -> Result<NextIdResponse, NextIdError> {
    let next_id: i64 = sqlx::query_scalar(
        "SELECT COALESCE((SELECT seq FROM sqlite_sequence WHERE name = ?), 0) + 1",
    )
    .bind(sequence.table())
    .fetch_one(pool)
    .await?;
    tracing::debug!(?sequence, next_id, "Computed next id");
    Ok(NextIdResponse { next_id })
}
