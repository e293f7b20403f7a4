//! Update experiment command
//!
//! Partially updates an existing experiment. Only the fields that are
//! provided will be updated; others remain unchanged.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{classify_sqlx, Classify, ErrorKind};
use crate::features::shared::error_helpers::is_integrity_violation;
use crate::features::shared::validation::{
    normalize_optional_text, validate_required_text, TextValidationError, MAX_NAME_LENGTH,
};
use crate::models::{Experiment, EXPERIMENT_COLUMNS};

/// Command to update an existing experiment
///
/// An empty (or whitespace-only) `description` clears the stored value.
///
/// # Examples
///
/// ```rust,ignore
/// use annotrack_core::features::experiments::commands::UpdateExperimentCommand;
///
/// let command = UpdateExperimentCommand {
///     id: 3,
///     name: Some("ResNet robustness v2".to_string()),
///     description: None, // keep existing description
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateExperimentCommand {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Validated changes; `description: Some(None)` clears the column
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

/// Errors that can occur when updating an experiment
#[derive(Debug, thiserror::Error)]
pub enum UpdateExperimentError {
    /// No fields were provided for update
    #[error("At least one field must be provided for update")]
    NoFieldsToUpdate,

    #[error("{0}")]
    Text(#[from] TextValidationError),

    #[error("Experiment {0} not found")]
    NotFound(i64),

    #[error("Experiment rejected by the store: {0}")]
    Integrity(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Experiment, UpdateExperimentError>> for UpdateExperimentCommand {}

impl crate::cqrs::middleware::Command for UpdateExperimentCommand {}

impl Classify for UpdateExperimentError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::NoFieldsToUpdate | Self::Text(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Integrity(_) => ErrorKind::Integrity,
            Self::Database(e) => classify_sqlx(e),
        }
    }
}

impl UpdateExperimentCommand {
    /// Validates the command parameters
    ///
    /// # Errors
    ///
    /// - `NoFieldsToUpdate` - Neither name nor description given
    /// - `Text` - Name is blank or too long
    pub fn validate(&self) -> Result<ExperimentChanges, UpdateExperimentError> {
        if self.name.is_none() && self.description.is_none() {
            return Err(UpdateExperimentError::NoFieldsToUpdate);
        }

        let name = self
            .name
            .as_deref()
            .map(|name| validate_required_text(name, "name", MAX_NAME_LENGTH))
            .transpose()?;

        let description = self
            .description
            .as_deref()
            .map(|d| normalize_optional_text(Some(d), "description", None))
            .transpose()?;

        Ok(ExperimentChanges { name, description })
    }
}

/// Handles the update experiment command
///
/// Reads the current row and writes the merged values back inside one
/// transaction.
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    command: UpdateExperimentCommand,
) -> Result<Experiment, UpdateExperimentError> {
    let changes = command.validate()?;

    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, Experiment>(&format!(
        "SELECT {} FROM experiments WHERE experiment_id = ?",
        EXPERIMENT_COLUMNS
    ))
    .bind(command.id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(UpdateExperimentError::NotFound(command.id))?;

    let name = changes.name.unwrap_or(current.name);
    let description = changes.description.unwrap_or(current.description);

    let updated = sqlx::query_as::<_, Experiment>(&format!(
        r#"
        UPDATE experiments
        SET name = ?, description = ?
        WHERE experiment_id = ?
        RETURNING {}
        "#,
        EXPERIMENT_COLUMNS
    ))
    .bind(&name)
    .bind(&description)
    .bind(command.id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if is_integrity_violation(&e) {
            return UpdateExperimentError::Integrity(e.to_string());
        }
        UpdateExperimentError::Database(e)
    })?;

    tx.commit().await?;

    tracing::info!(experiment_id = updated.id, "Experiment updated");

    Ok(updated)
}
