//! Database models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use std::fmt;
use std::str::FromStr;

use crate::features::shared::validation::{check_box, CoordinatesValidationError};

/// Category of adversarial perturbation applied to an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackType {
    NoAttack,
    Fgsm,
    Pgd,
    Deepfool,
    CarliniWagner,
    AdversarialPatch,
    OnePixel,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown attack type '{0}' (expected one of: no_attack, fgsm, pgd, deepfool, carlini_wagner, adversarial_patch, one_pixel)")]
pub struct UnknownAttackType(pub String);

impl AttackType {
    pub const ALL: [AttackType; 7] = [
        AttackType::NoAttack,
        AttackType::Fgsm,
        AttackType::Pgd,
        AttackType::Deepfool,
        AttackType::CarliniWagner,
        AttackType::AdversarialPatch,
        AttackType::OnePixel,
    ];

    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AttackType::NoAttack => "no_attack",
            AttackType::Fgsm => "fgsm",
            AttackType::Pgd => "pgd",
            AttackType::Deepfool => "deepfool",
            AttackType::CarliniWagner => "carlini_wagner",
            AttackType::AdversarialPatch => "adversarial_patch",
            AttackType::OnePixel => "one_pixel",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            AttackType::NoAttack => "No attack",
            AttackType::Fgsm => "FGSM",
            AttackType::Pgd => "PGD",
            AttackType::Deepfool => "DeepFool",
            AttackType::CarliniWagner => "Carlini & Wagner",
            AttackType::AdversarialPatch => "Adversarial patch",
            AttackType::OnePixel => "One pixel",
        }
    }
}

impl FromStr for AttackType {
    type Err = UnknownAttackType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        AttackType::ALL
            .into_iter()
            .find(|attack| attack.as_str() == normalized)
            .ok_or_else(|| UnknownAttackType(s.to_string()))
    }
}

impl fmt::Display for AttackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axis-aligned box in native image pixels
///
/// Always holds non-negative corners with `x2 > x1` and `y2 > y1`; the only
/// ways to build one go through [`BoundingBox::try_from`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[i64; 4]", into = "[i64; 4]")]
pub struct BoundingBox {
    x1: i64,
    y1: i64,
    x2: i64,
    y2: i64,
}

impl BoundingBox {
    pub fn x1(&self) -> i64 {
        self.x1
    }

    pub fn y1(&self) -> i64 {
        self.y1
    }

    pub fn x2(&self) -> i64 {
        self.x2
    }

    pub fn y2(&self) -> i64 {
        self.y2
    }

    pub fn width(&self) -> i64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i64 {
        self.y2 - self.y1
    }
}

impl TryFrom<[i64; 4]> for BoundingBox {
    type Error = CoordinatesValidationError;

    fn try_from(coords: [i64; 4]) -> Result<Self, Self::Error> {
        check_box(coords)?;
        let [x1, y1, x2, y2] = coords;
        Ok(Self { x1, y1, x2, y2 })
    }
}

impl From<BoundingBox> for [i64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.x1, bbox.y1, bbox.x2, bbox.y2]
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.x1, self.y1, self.x2, self.y2)
    }
}

/// Ordering direction for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("invalid sort direction '{}' (expected asc or desc)", other)),
        }
    }
}

/// Experiment model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Experiment {
    #[sqlx(rename = "experiment_id")]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_date: NaiveDate,
}

/// Run model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Run {
    #[sqlx(rename = "run_id")]
    pub id: i64,
    pub experiment_id: i64,
    pub run_date: DateTime<Utc>,
    pub accuracy: Option<f64>,
    pub flagged: Option<bool>,
}

/// Image model, including the experiment reached through its run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: i64,
    pub run_id: i64,
    pub experiment_id: i64,
    pub file_path: String,
    pub original_name: Option<String>,
    pub attack_type: AttackType,
    pub added_date: Option<DateTime<Utc>>,
    pub coordinates: Option<BoundingBox>,
}

pub(crate) const EXPERIMENT_COLUMNS: &str = "experiment_id, name, description, created_date";

pub(crate) const RUN_COLUMNS: &str = "run_id, experiment_id, run_date, accuracy, flagged";

/// Image projection joined through `runs`; callers append WHERE/ORDER BY
pub(crate) const IMAGE_SELECT: &str = r#"
    SELECT i.image_id, i.run_id, r.experiment_id, i.file_path, i.original_name,
           i.attack_type, i.added_date, i.x1, i.y1, i.x2, i.y2
    FROM images i
    JOIN runs r ON r.run_id = i.run_id
"#;

impl<'r> FromRow<'r, SqliteRow> for Image {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let attack_type: String = row.try_get("attack_type")?;
        let attack_type = attack_type
            .parse::<AttackType>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "attack_type".to_string(),
                source: Box::new(e),
            })?;

        let coordinates = match (
            row.try_get::<Option<i64>, _>("x1")?,
            row.try_get::<Option<i64>, _>("y1")?,
            row.try_get::<Option<i64>, _>("x2")?,
            row.try_get::<Option<i64>, _>("y2")?,
        ) {
            (Some(x1), Some(y1), Some(x2), Some(y2)) => Some(
                BoundingBox::try_from([x1, y1, x2, y2]).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "x1".to_string(),
                    source: Box::new(e),
                })?,
            ),
            _ => None,
        };

        Ok(Self {
            id: row.try_get("image_id")?,
            run_id: row.try_get("run_id")?,
            experiment_id: row.try_get("experiment_id")?,
            file_path: row.try_get("file_path")?,
            original_name: row.try_get("original_name")?,
            attack_type,
            added_date: row.try_get("added_date")?,
            coordinates,
        })
    }
}
