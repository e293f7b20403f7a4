use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{classify_sqlx, Classify, ErrorKind};
use crate::models::{Experiment, EXPERIMENT_COLUMNS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetExperimentQuery {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum GetExperimentError {
    #[error("Experiment {0} not found")]
    NotFound(i64),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Experiment, GetExperimentError>> for GetExperimentQuery {}

impl crate::cqrs::middleware::Query for GetExperimentQuery {}

impl Classify for GetExperimentError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Database(e) => classify_sqlx(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    query: GetExperimentQuery,
) -> Result<Experiment, GetExperimentError> {
    sqlx::query_as::<_, Experiment>(&format!(
        "SELECT {} FROM experiments WHERE experiment_id = ?",
        EXPERIMENT_COLUMNS
    ))
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetExperimentError::NotFound(query.id))
}
