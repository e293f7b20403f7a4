use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{classify_sqlx, Classify, ErrorKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteExperimentCommand {
    pub id: i64,
}

/// Rows removed by the delete, cascades included
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteExperimentResponse {
    pub id: i64,
    pub runs_removed: i64,
    pub images_removed: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteExperimentError {
    #[error("Experiment {0} not found")]
    NotFound(i64),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteExperimentResponse, DeleteExperimentError>> for DeleteExperimentCommand {}

impl crate::cqrs::middleware::Command for DeleteExperimentCommand {}

impl Classify for DeleteExperimentError {
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
    command: DeleteExperimentCommand,
) -> Result<DeleteExperimentResponse, DeleteExperimentError> {
    let mut tx = pool.begin().await?;

    let runs_removed: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM runs WHERE experiment_id = ?")
        .bind(command.id)
        .fetch_one(&mut *tx)
        .await?;

    let images_removed: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM images i
        JOIN runs r ON r.run_id = i.run_id
        WHERE r.experiment_id = ?
        "#,
    )
    .bind(command.id)
    .fetch_one(&mut *tx)
    .await?;

    let result = sqlx::query("DELETE FROM experiments WHERE experiment_id = ?")
        .bind(command.id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteExperimentError::NotFound(command.id));
    }

    tx.commit().await?;

    tracing::info!(
        experiment_id = command.id,
        runs_removed,
        images_removed,
        "Experiment deleted"
    );

    Ok(DeleteExperimentResponse {
        id: command.id,
        runs_removed,
        images_removed,
    })
}
