use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{classify_sqlx, Classify, ErrorKind};
use crate::models::{Experiment, EXPERIMENT_COLUMNS};

/// All experiments, ordered by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListExperimentsQuery {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListExperimentsResponse {
    pub items: Vec<Experiment>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListExperimentsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ListExperimentsResponse, ListExperimentsError>> for ListExperimentsQuery {}

impl crate::cqrs::middleware::Query for ListExperimentsQuery {}

impl Classify for ListExperimentsError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Database(e) => classify_sqlx(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    _query: ListExperimentsQuery,
) -> Result<ListExperimentsResponse, ListExperimentsError> {
    let items = sqlx::query_as::<_, Experiment>(&format!(
        "SELECT {} FROM experiments ORDER BY experiment_id ASC",
        EXPERIMENT_COLUMNS
    ))
    .fetch_all(&pool)
    .await?;

    tracing::debug!(count = items.len(), "Listed experiments");

    Ok(ListExperimentsResponse { items })
}
