use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::features::shared::identity::{next_id, IdSequence, NextIdError, NextIdResponse};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NextRunIdQuery {}

impl Request<Result<NextIdResponse, NextIdError>> for NextRunIdQuery {}

impl crate::cqrs::middleware::Query for NextRunIdQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, _query: NextRunIdQuery) -> Result<NextIdResponse, NextIdError> {
    next_id(&pool, IdSequence::Runs).await
}
