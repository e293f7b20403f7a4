//! Update image command
//!
//! Partially updates an existing image. The owning run is fixed at creation.
//! Coordinates may be replaced or cleared, never both in one command.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::create::coordinate_columns;
use crate::error::{classify_sqlx, Classify, ErrorKind};
use crate::features::shared::error_helpers::is_integrity_violation;
use crate::features::shared::validation::{
    normalize_optional_text, validate_coordinates, validate_required_text, CoordinateValue,
    CoordinatesValidationError, TextValidationError, MAX_FILE_PATH_LENGTH,
    MAX_ORIGINAL_NAME_LENGTH,
};
use crate::models::{AttackType, BoundingBox, Image, IMAGE_SELECT};

/// Command to update an existing image
///
/// # Examples
///
/// ```rust,ignore
/// use annotrack_core::features::images::commands::UpdateImageCommand;
/// use annotrack_core::models::AttackType;
///
/// let command = UpdateImageCommand {
///     attack_type: Some(AttackType::OnePixel),
///     ..UpdateImageCommand::new(12)
/// };
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateImageCommand {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    /// Empty or whitespace-only clears the stored name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_type: Option<AttackType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<CoordinateValue>>,
    /// Remove the stored bounding box
    #[serde(default)]
    pub clear_coordinates: bool,
}

/// Validated changes; inner `None` clears the column
#[derive(Debug, Clone, PartialEq)]
pub struct ImageChanges {
    pub file_path: Option<String>,
    pub original_name: Option<Option<String>>,
    pub attack_type: Option<AttackType>,
    pub coordinates: Option<Option<BoundingBox>>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateImageError {
    #[error("At least one field must be provided for update")]
    NoFieldsToUpdate,

    #[error("Coordinates cannot be both replaced and cleared")]
    ConflictingCoordinates,

    #[error("{0}")]
    Text(#[from] TextValidationError),

    #[error("{0}")]
    Coordinates(#[from] CoordinatesValidationError),

    #[error("Image {0} not found")]
    NotFound(i64),

    #[error("Image rejected by the store: {0}")]
    Integrity(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Image, UpdateImageError>> for UpdateImageCommand {}

impl crate::cqrs::middleware::Command for UpdateImageCommand {}

impl Classify for UpdateImageError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::NoFieldsToUpdate
            | Self::ConflictingCoordinates
            | Self::Text(_)
            | Self::Coordinates(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Integrity(_) => ErrorKind::Integrity,
            Self::Database(e) => classify_sqlx(e),
        }
    }
}

impl UpdateImageCommand {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<ImageChanges, UpdateImageError> {
        if self.file_path.is_none()
            && self.original_name.is_none()
            && self.attack_type.is_none()
            && self.coordinates.is_none()
            && !self.clear_coordinates
        {
            return Err(UpdateImageError::NoFieldsToUpdate);
        }
        if self.clear_coordinates && self.coordinates.is_some() {
            return Err(UpdateImageError::ConflictingCoordinates);
        }

        let file_path = self
            .file_path
            .as_deref()
            .map(|path| validate_required_text(path, "file_path", MAX_FILE_PATH_LENGTH))
            .transpose()?;

        let original_name = self
            .original_name
            .as_deref()
            .map(|name| {
                normalize_optional_text(Some(name), "original_name", Some(MAX_ORIGINAL_NAME_LENGTH))
            })
            .transpose()?;

        let coordinates = if self.clear_coordinates {
            Some(None)
        } else {
            self.coordinates
                .as_deref()
                .map(validate_coordinates)
                .transpose()?
                .map(Some)
        };

        Ok(ImageChanges {
            file_path,
            original_name,
            attack_type: self.attack_type,
            coordinates,
        })
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: SqlitePool, command: UpdateImageCommand) -> Result<Image, UpdateImageError> {
    let changes = command.validate()?;

    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, Image>(&format!("{} WHERE i.image_id = ?", IMAGE_SELECT))
        .bind(command.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(UpdateImageError::NotFound(command.id))?;

    let file_path = changes.file_path.unwrap_or(current.file_path);
    let original_name = changes.original_name.unwrap_or(current.original_name);
    let attack_type = changes.attack_type.unwrap_or(current.attack_type);
    let [x1, y1, x2, y2] = coordinate_columns(changes.coordinates.unwrap_or(current.coordinates));

    sqlx::query(
        r#"
        UPDATE images
        SET file_path = ?, original_name = ?, attack_type = ?, x1 = ?, y1 = ?, x2 = ?, y2 = ?
        WHERE image_id = ?
        "#,
    )
    .bind(&file_path)
    .bind(&original_name)
    .bind(attack_type.as_str())
    .bind(x1)
    .bind(y1)
    .bind(x2)
    .bind(y2)
    .bind(command.id)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        if is_integrity_violation(&e) {
            return UpdateImageError::Integrity(e.to_string());
        }
        UpdateImageError::Database(e)
    })?;

    let updated = sqlx::query_as::<_, Image>(&format!("{} WHERE i.image_id = ?", IMAGE_SELECT))
        .bind(command.id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(image_id = updated.id, attack_type = %updated.attack_type, "Image updated");

    Ok(updated)
}
