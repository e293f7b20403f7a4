//! Update run command
//!
//! Changes the accuracy and/or flagged marker of an existing run. Either can
//! also be cleared back to unknown. The owning experiment and the run date are
//! fixed at creation.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{classify_sqlx, Classify, ErrorKind};
use crate::features::shared::error_helpers::is_integrity_violation;
use crate::features::shared::validation::{validate_accuracy, AccuracyValidationError};
use crate::models::{Run, RUN_COLUMNS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRunCommand {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flagged: Option<bool>,
    /// Reset accuracy to unknown
    #[serde(default)]
    pub clear_accuracy: bool,
    /// Reset the flagged marker to unknown
    #[serde(default)]
    pub clear_flagged: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateRunError {
    #[error("At least one field must be provided for update")]
    NoFieldsToUpdate,

    #[error("{0} cannot be both set and cleared")]
    Conflicting(&'static str),

    #[error("{0}")]
    Accuracy(#[from] AccuracyValidationError),

    #[error("Run {0} not found")]
    NotFound(i64),

    #[error("Run rejected by the store: {0}")]
    Integrity(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Run, UpdateRunError>> for UpdateRunCommand {}

impl crate::cqrs::middleware::Command for UpdateRunCommand {}

impl Classify for UpdateRunError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::NoFieldsToUpdate | Self::Conflicting(_) | Self::Accuracy(_) => {
                ErrorKind::Validation
            },
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Integrity(_) => ErrorKind::Integrity,
            Self::Database(e) => classify_sqlx(e),
        }
    }
}

impl UpdateRunCommand {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), UpdateRunError> {
        if self.accuracy.is_none()
            && self.flagged.is_none()
            && !self.clear_accuracy
            && !self.clear_flagged
        {
            return Err(UpdateRunError::NoFieldsToUpdate);
        }
        if self.clear_accuracy && self.accuracy.is_some() {
            return Err(UpdateRunError::Conflicting("accuracy"));
        }
        if self.clear_flagged && self.flagged.is_some() {
            return Err(UpdateRunError::Conflicting("flagged"));
        }
        if let Some(accuracy) = self.accuracy {
            validate_accuracy(accuracy)?;
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, command: UpdateRunCommand) -> Result<Run, UpdateRunError> {
    command.validate()?;

    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, Run>(&format!(
        "SELECT {} FROM runs WHERE run_id = ?",
        RUN_COLUMNS
    ))
    .bind(command.id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(UpdateRunError::NotFound(command.id))?;

    let accuracy = if command.clear_accuracy {
        None
    } else {
        command.accuracy.or(current.accuracy)
    };
    let flagged = if command.clear_flagged {
        None
    } else {
        command.flagged.or(current.flagged)
    };

    let updated = sqlx::query_as::<_, Run>(&format!(
        r#"
        UPDATE runs
        SET accuracy = ?, flagged = ?
        WHERE run_id = ?
        RETURNING {}
        "#,
        RUN_COLUMNS
    ))
    .bind(accuracy)
    .bind(flagged)
    .bind(command.id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if is_integrity_violation(&e) {
            return UpdateRunError::Integrity(e.to_string());
        }
        UpdateRunError::Database(e)
    })?;

    tx.commit().await?;

    tracing::info!(run_id = updated.id, "Run updated");

    Ok(updated)
}
