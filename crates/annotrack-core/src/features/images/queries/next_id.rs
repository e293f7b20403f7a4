use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::features::shared::identity::{next_id, IdSequence, NextIdError, NextIdResponse};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NextImageIdQuery {}

impl Request<Result<NextIdResponse, NextIdError>> for NextImageIdQuery {}

impl crate::cqrs::middleware::Query for NextImageIdQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, _query: NextImageIdQuery) -> Result<NextIdResponse, NextIdError> {
    next_id(&pool, IdSequence::Images).await
}
