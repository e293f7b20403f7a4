//! Create experiment command
//!
//! Validates the experiment fields and inserts a new row. The creation date
//! defaults to today's local date when not supplied.

use chrono::{Local, NaiveDate};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{classify_sqlx, Classify, ErrorKind};
use crate::features::shared::error_helpers::is_integrity_violation;
use crate::features::shared::validation::{
    normalize_optional_text, validate_past_date, validate_required_text, DateValidationError,
    TextValidationError, MAX_NAME_LENGTH,
};
use crate::models::{Experiment, EXPERIMENT_COLUMNS};

/// Command to create a new experiment
///
/// # Examples
///
/// ```rust,ignore
/// use annotrack_core::features::experiments::commands::CreateExperimentCommand;
///
/// let command = CreateExperimentCommand {
///     name: "ResNet robustness".to_string(),
///     description: Some("PGD sweep over epsilon".to_string()),
///     created_date: None, // today
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExperimentCommand {
    /// Display name (required, at most 255 characters after trimming)
    pub name: String,

    /// Optional free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation date; defaults to today
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<NaiveDate>,
}

/// Normalized values ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewExperiment {
    pub name: String,
    pub description: Option<String>,
    pub created_date: NaiveDate,
}

/// Errors that can occur when creating an experiment
#[derive(Debug, thiserror::Error)]
pub enum CreateExperimentError {
    #[error("{0}")]
    Text(#[from] TextValidationError),

    #[error("{0}")]
    Date(#[from] DateValidationError),

    #[error("Experiment rejected by the store: {0}")]
    Integrity(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Experiment, CreateExperimentError>> for CreateExperimentCommand {}

impl crate::cqrs::middleware::Command for CreateExperimentCommand {}

impl Classify for CreateExperimentError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Text(_) | Self::Date(_) => ErrorKind::Validation,
            Self::Integrity(_) => ErrorKind::Integrity,
            Self::Database(e) => classify_sqlx(e),
        }
    }
}

impl CreateExperimentCommand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            created_date: None,
        }
    }

    /// Validates the command against the current local date
    ///
    /// # Errors
    ///
    /// - Name is empty after trimming or longer than 255 characters
    /// - Creation date is after today
    #[tracing::instrument(skip(self), fields(name = %self.name))]
    pub fn validate(&self) -> Result<NewExperiment, CreateExperimentError> {
        let today = Local::now().date_naive();

        let name = validate_required_text(&self.name, "name", MAX_NAME_LENGTH)?;
        let description = normalize_optional_text(self.description.as_deref(), "description", None)?;
        let created_date = match self.created_date {
            Some(date) => validate_past_date(date, today, "created_date")?,
            None => today,
        };

        tracing::debug!("Command validation passed");
        Ok(NewExperiment {
            name,
            description,
            created_date,
        })
    }
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
pub async fn handle(
    pool: SqlitePool,
    command: CreateExperimentCommand,
) -> Result<Experiment, CreateExperimentError> {
    let new = command.validate()?;

    tracing::info!("Creating experiment");

    let experiment = sqlx::query_as::<_, Experiment>(&format!(
        r#"
        INSERT INTO experiments (name, description, created_date)
        VALUES (?, ?, ?)
        RETURNING {}
        "#,
        EXPERIMENT_COLUMNS
    ))
    .bind(&new.name)
    .bind(&new.description)
    .bind(new.created_date)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if is_integrity_violation(&e) {
            return CreateExperimentError::Integrity(e.to_string());
        }
        CreateExperimentError::Database(e)
    })?;

    tracing::info!(experiment_id = experiment.id, "Experiment created successfully");

    Ok(experiment)
}
