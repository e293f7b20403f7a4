use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{classify_sqlx, Classify, ErrorKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRunCommand {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRunResponse {
    pub id: i64,
    pub images_removed: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteRunError {
    #[error("Run {0} not found")]
    NotFound(i64),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteRunResponse, DeleteRunError>> for DeleteRunCommand {}

impl crate::cqrs::middleware::Command for DeleteRunCommand {}

impl Classify for DeleteRunError {
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
    command: DeleteRunCommand,
) -> Result<DeleteRunResponse, DeleteRunError> {
    let mut tx = pool.begin().await?;

    let images_removed: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM images WHERE run_id = ?")
        .bind(command.id)
        .fetch_one(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM runs WHERE run_id = ?")
        .bind(command.id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteRunError::NotFound(command.id));
    }

    tx.commit().await?;

    tracing::info!(run_id = command.id, images_removed, "Run deleted");

    Ok(DeleteRunResponse {
        id: command.id,
        images_removed,
    })
}
