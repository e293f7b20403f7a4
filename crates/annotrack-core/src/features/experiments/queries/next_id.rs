use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::features::shared::identity::{next_id, IdSequence, NextIdError, NextIdResponse};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NextExperimentIdQuery {}

impl Request<Result<NextIdResponse, NextIdError>> for NextExperimentIdQuery {}

impl crate::cqrs::middleware::Query for NextExperimentIdQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    _query: NextExperimentIdQuery,
) -> Result<NextIdResponse, NextIdError> {
    next_id(&pool, IdSequence::Experiments).await
}
