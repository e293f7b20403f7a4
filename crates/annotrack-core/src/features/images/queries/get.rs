use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{classify_sqlx, Classify, ErrorKind};
use crate::models::{Image, IMAGE_SELECT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetImageQuery {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum GetImageError {
    #[error("Image {0} not found")]
    NotFound(i64),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Image, GetImageError>> for GetImageQuery {}

impl crate::cqrs::middleware::Query for GetImageQuery {}

impl Classify for GetImageError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Database(e) => classify_sqlx(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, query: GetImageQuery) -> Result<Image, GetImageError> {
    sqlx::query_as::<_, Image>(&format!("{} WHERE i.image_id = ?", IMAGE_SELECT))
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(GetImageError::NotFound(query.id))
}
