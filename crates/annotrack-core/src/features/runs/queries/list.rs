use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::{classify_sqlx, Classify, ErrorKind};
use crate::models::{Run, RUN_COLUMNS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListRunsQuery {
    /// Only runs belonging to this experiment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiment_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRunsResponse {
    pub items: Vec<Run>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListRunsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ListRunsResponse, ListRunsError>> for ListRunsQuery {}

impl crate::cqrs::middleware::Query for ListRunsQuery {}

impl Classify for ListRunsError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Database(e) => classify_sqlx(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, query: ListRunsQuery) -> Result<ListRunsResponse, ListRunsError> {
    let mut builder = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM runs", RUN_COLUMNS));
    if let Some(experiment_id) = query.experiment_id {
        builder.push(" WHERE experiment_id = ").push_bind(experiment_id);
    }
    builder.push(" ORDER BY run_id ASC");

    let items = builder.build_query_as::<Run>().fetch_all(&pool).await?;

    tracing::debug!(count = items.len(), "Listed runs");

    Ok(ListRunsResponse { items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{TestDb, TestExperiment, TestRun};

    #[tokio::test]
    async fn test_handle_filters_by_experiment() {
        let db = TestDb::new().await;
        let first = TestExperiment::new("first").insert(db.pool()).await.unwrap();
        let second = TestExperiment::new("second").insert(db.pool()).await.unwrap();
        let a = TestRun::new(&first).insert(db.pool()).await.unwrap();
        TestRun::new(&second).insert(db.pool()).await.unwrap();
        let c = TestRun::new(&first).insert(db.pool()).await.unwrap();

        let all = handle(db.pool_owned(), ListRunsQuery::default()).await.unwrap();
        assert_eq!(all.items.len(), 3);

        let filtered = handle(
            db.pool_owned(),
            ListRunsQuery {
                experiment_id: Some(first.id),
            },
        )
        .await
        .unwrap();
        let ids: Vec<i64> = filtered.items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
    }

    #[tokio::test]
    async fn test_handle_unknown_experiment_is_empty() {
        let db = TestDb::new().await;
        let response = handle(
            db.pool_owned(),
            ListRunsQuery {
                experiment_id: Some(77),
            },
        )
        .await
        .unwrap();
        assert!(response.items.is_empty());
    }
}
