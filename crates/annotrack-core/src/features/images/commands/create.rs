//! Create image command
//!
//! Registers an annotated image under an existing run. Coordinates arrive
//! raw (integers or floats, as a form or JSON payload supplies them) and are
//! validated into a [`BoundingBox`] before anything is written.

use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{classify_sqlx, Classify, ErrorKind};
use crate::features::shared::error_helpers::map_constraint_violation;
use crate::features::shared::validation::{
    normalize_optional_text, validate_coordinates, validate_past_timestamp,
    validate_required_text, CoordinateValue, CoordinatesValidationError, DateValidationError,
    TextValidationError, MAX_FILE_PATH_LENGTH, MAX_ORIGINAL_NAME_LENGTH,
};
use crate::models::{AttackType, BoundingBox, Image, IMAGE_SELECT};

/// Command to create a new image
///
/// # Examples
///
/// ```rust,ignore
/// use annotrack_core::features::images::commands::CreateImageCommand;
/// use annotrack_core::models::AttackType;
///
/// let command = CreateImageCommand {
///     run_id: 4,
///     file_path: "/data/imagenet/n01440764_10026.JPEG".to_string(),
///     original_name: Some("tench.jpeg".to_string()),
///     attack_type: AttackType::Pgd,
///     added_date: None,
///     coordinates: Some(vec![12i64.into(), 30i64.into(), 220i64.into(), 190i64.into()]),
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateImageCommand {
    pub run_id: i64,

    /// Path to the image file (required, at most 500 characters)
    pub file_path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,

    pub attack_type: AttackType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_date: Option<DateTime<Utc>>,

    /// `[x1, y1, x2, y2]` in native image pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<CoordinateValue>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewImage {
    pub run_id: i64,
    pub file_path: String,
    pub original_name: Option<String>,
    pub attack_type: AttackType,
    pub added_date: Option<DateTime<Utc>>,
    pub coordinates: Option<BoundingBox>,
}

/// Errors that can occur when creating an image
#[derive(Debug, thiserror::Error)]
pub enum CreateImageError {
    #[error("{0}")]
    Text(#[from] TextValidationError),

    #[error("{0}")]
    Date(#[from] DateValidationError),

    #[error("{0}")]
    Coordinates(#[from] CoordinatesValidationError),

    #[error("Run {0} does not exist")]
    RunNotFound(i64),

    #[error("Image rejected by the store: {0}")]
    Integrity(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Image, CreateImageError>> for CreateImageCommand {}

impl crate::cqrs::middleware::Command for CreateImageCommand {}

impl Classify for CreateImageError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Text(_) | Self::Date(_) | Self::Coordinates(_) => ErrorKind::Validation,
            Self::RunNotFound(_) => ErrorKind::Reference,
            Self::Integrity(_) => ErrorKind::Integrity,
            Self::Database(e) => classify_sqlx(e),
        }
    }
}

impl CreateImageCommand {
    pub fn new(run_id: i64, file_path: impl Into<String>, attack_type: AttackType) -> Self {
        Self {
            run_id,
            file_path: file_path.into(),
            original_name: None,
            attack_type,
            added_date: None,
            coordinates: None,
        }
    }

    /// Validates the command against the current clock
    ///
    /// # Errors
    ///
    /// - File path blank or longer than 500 characters
    /// - Original name longer than 255 characters
    /// - Added date in the future
    /// - Coordinates not four non-negative integers with `x2 > x1`, `y2 > y1`
    #[tracing::instrument(skip(self), fields(run_id = self.run_id))]
    pub fn validate(&self) -> Result<NewImage, CreateImageError> {
        let file_path = validate_required_text(&self.file_path, "file_path", MAX_FILE_PATH_LENGTH)?;
        let original_name = normalize_optional_text(
            self.original_name.as_deref(),
            "original_name",
            Some(MAX_ORIGINAL_NAME_LENGTH),
        )?;
        let added_date = self
            .added_date
            .map(|date| validate_past_timestamp(date, Utc::now(), "added_date"))
            .transpose()?;
        let coordinates = self
            .coordinates
            .as_deref()
            .map(validate_coordinates)
            .transpose()?;

        tracing::debug!("Command validation passed");
        Ok(NewImage {
            run_id: self.run_id,
            file_path,
            original_name,
            attack_type: self.attack_type,
            added_date,
            coordinates,
        })
    }
}

/// Split an optional box into the four nullable coordinate columns
pub(crate) fn coordinate_columns(coordinates: Option<BoundingBox>) -> [Option<i64>; 4] {
    match coordinates {
        Some(bbox) => <[i64; 4]>::from(bbox).map(Some),
        None => [None; 4],
    }
}

#[tracing::instrument(
    skip(pool, command),
    fields(run_id = command.run_id, attack_type = %command.attack_type)
)]
pub async fn handle(pool: SqlitePool, command: CreateImageCommand) -> Result<Image, CreateImageError> {
    let new = command.validate()?;

    let mut tx = pool.begin().await?;

    let parent: Option<i64> = sqlx::query_scalar("SELECT run_id FROM runs WHERE run_id = ?")
        .bind(new.run_id)
        .fetch_optional(&mut *tx)
        .await?;
    if parent.is_none() {
        tracing::warn!("Image references a missing run");
        return Err(CreateImageError::RunNotFound(new.run_id));
    }

    tracing::info!("Creating image");

    let [x1, y1, x2, y2] = coordinate_columns(new.coordinates);
    let image_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO images (run_id, file_path, original_name, attack_type, added_date, x1, y1, x2, y2)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING image_id
        "#,
    )
    .bind(new.run_id)
    .bind(&new.file_path)
    .bind(&new.original_name)
    .bind(new.attack_type.as_str())
    .bind(new.added_date)
    .bind(x1)
    .bind(y1)
    .bind(x2)
    .bind(y2)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        map_constraint_violation(
            e,
            |e| CreateImageError::Integrity(e.to_string()),
            CreateImageError::RunNotFound(new.run_id),
            CreateImageError::Database,
        )
    })?;

    let image = sqlx::query_as::<_, Image>(&format!("{} WHERE i.image_id = ?", IMAGE_SELECT))
        .bind(image_id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(image_id, "Image created successfully");

    Ok(image)
}
