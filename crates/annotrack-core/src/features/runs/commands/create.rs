//! Create run command
//!
//! Attaches a new run to an existing experiment. The parent check and the
//! insert share one transaction.

use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{classify_sqlx, Classify, ErrorKind};
use crate::features::shared::error_helpers::map_constraint_violation;
use crate::features::shared::validation::{
    validate_accuracy, validate_past_timestamp, AccuracyValidationError, DateValidationError,
};
use crate::models::{Run, RUN_COLUMNS};

/// Command to create a new run
///
/// # Examples
///
/// ```rust,ignore
/// use annotrack_core::features::runs::commands::CreateRunCommand;
///
/// let command = CreateRunCommand {
///     experiment_id: 1,
///     run_date: None, // now
///     accuracy: Some(0.87),
///     flagged: Some(false),
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRunCommand {
    pub experiment_id: i64,

    /// When the run happened; defaults to now
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_date: Option<DateTime<Utc>>,

    /// Score in `[0.0, 1.0]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub flagged: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRun {
    pub experiment_id: i64,
    pub run_date: DateTime<Utc>,
    pub accuracy: Option<f64>,
    pub flagged: Option<bool>,
}

/// Errors that can occur when creating a run
#[derive(Debug, thiserror::Error)]
pub enum CreateRunError {
    #[error("{0}")]
    Date(#[from] DateValidationError),

    #[error("{0}")]
    Accuracy(#[from] AccuracyValidationError),

    #[error("Experiment {0} does not exist")]
    ExperimentNotFound(i64),

    #[error("Run rejected by the store: {0}")]
    Integrity(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Run, CreateRunError>> for CreateRunCommand {}

impl crate::cqrs::middleware::Command for CreateRunCommand {}

impl Classify for CreateRunError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Date(_) | Self::Accuracy(_) => ErrorKind::Validation,
            Self::ExperimentNotFound(_) => ErrorKind::Reference,
            Self::Integrity(_) => ErrorKind::Integrity,
            Self::Database(e) => classify_sqlx(e),
        }
    }
}

impl CreateRunCommand {
    pub fn new(experiment_id: i64) -> Self {
        Self {
            experiment_id,
            run_date: None,
            accuracy: None,
            flagged: None,
        }
    }

    /// Validates the command against the current clock
    #[tracing::instrument(skip(self), fields(experiment_id = self.experiment_id))]
    pub fn validate(&self) -> Result<NewRun, CreateRunError> {
        let now = Utc::now();

        let run_date = match self.run_date {
            Some(run_date) => validate_past_timestamp(run_date, now, "run_date")?,
            None => now,
        };
        let accuracy = self.accuracy.map(validate_accuracy).transpose()?;

        tracing::debug!("Command validation passed");
        Ok(NewRun {
            experiment_id: self.experiment_id,
            run_date,
            accuracy,
            flagged: self.flagged,
        })
    }
}

#[tracing::instrument(skip(pool, command), fields(experiment_id = command.experiment_id))]
pub async fn handle(pool: SqlitePool, command: CreateRunCommand) -> Result<Run, CreateRunError> {
    let new = command.validate()?;

    let mut tx = pool.begin().await?;

    let parent: Option<i64> =
        sqlx::query_scalar("SELECT experiment_id FROM experiments WHERE experiment_id = ?")
            .bind(new.experiment_id)
            .fetch_optional(&mut *tx)
            .await?;
    if parent.is_none() {
        tracing::warn!("Run references a missing experiment");
        return Err(CreateRunError::ExperimentNotFound(new.experiment_id));
    }

    tracing::info!("Creating run");

    let run = sqlx::query_as::<_, Run>(&format!(
        r#"
        INSERT INTO runs (experiment_id, run_date, accuracy, flagged)
        VALUES (?, ?, ?, ?)
        RETURNING {}
        "#,
        RUN_COLUMNS
    ))
    .bind(new.experiment_id)
    .bind(new.run_date)
    .bind(new.accuracy)
    .bind(new.flagged)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        map_constraint_violation(
            e,
            |e| CreateRunError::Integrity(e.to_string()),
            CreateRunError::ExperimentNotFound(new.experiment_id),
            CreateRunError::Database,
        )
    })?;

    tx.commit().await?;

    tracing::info!(run_id = run.id, "Run created successfully");

    Ok(run)
}
