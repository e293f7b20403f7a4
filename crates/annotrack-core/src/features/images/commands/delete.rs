use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{classify_sqlx, Classify, ErrorKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteImageCommand {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteImageResponse {
    pub id: i64,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteImageError {
    #[error("Image {0} not found")]
    NotFound(i64),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteImageResponse, DeleteImageError>> for DeleteImageCommand {}

impl crate::cqrs::middleware::Command for DeleteImageCommand {}

impl Classify for DeleteImageError {
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
    command: DeleteImageCommand,
) -> Result<DeleteImageResponse, DeleteImageError> {
    let result = sqlx::query("DELETE FROM images WHERE image_id = ?")
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteImageError::NotFound(command.id));
    }

    tracing::info!(image_id = command.id, "Image deleted");

    Ok(DeleteImageResponse {
        id: command.id,
        deleted: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{TestDb, TestExperiment, TestImage, TestRun};

    #[tokio::test]
    async fn test_handle_deletes_image() {
        let db = TestDb::new().await;
        let experiment = TestExperiment::new("exp").insert(db.pool()).await.unwrap();
        let run = TestRun::new(&experiment).insert(db.pool()).await.unwrap();
        let image = TestImage::new(&run, "/a.png").insert(db.pool()).await.unwrap();

        let response = handle(db.pool_owned(), DeleteImageCommand { id: image.id })
            .await
            .unwrap();
        assert!(response.deleted);
        assert_eq!(db.count("images").await, 0);
        assert_eq!(db.count("runs").await, 1);
    }

    #[tokio::test]
    async fn test_handle_not_found() {
        let db = TestDb::new().await;
        assert!(matches!(
            handle(db.pool_owned(), DeleteImageCommand { id: 1 }).await,
            Err(DeleteImageError::NotFound(1))
        ));
    }
}
