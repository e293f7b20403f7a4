use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{classify_sqlx, Classify, ErrorKind};
use crate::models::{Run, RUN_COLUMNS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetRunQuery {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum GetRunError {
    #[error("Run {0} not found")]
    NotFound(i64),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Run, GetRunError>> for GetRunQuery {}

impl crate::cqrs::middleware::Query for GetRunQuery {}

impl Classify for GetRunError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Database(e) => classify_sqlx(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, query: GetRunQuery) -> Result<Run, GetRunError> {
    sqlx::query_as::<_, Run>(&format!("SELECT {} FROM runs WHERE run_id = ?", RUN_COLUMNS))
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(GetRunError::NotFound(query.id))
}
