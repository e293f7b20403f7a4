//! Test helpers and fixtures for database tests
//!
//! Provides a throwaway database plus builders that insert rows directly,
//! bypassing validation, so handler tests can set up state in one line.
//!
//! # Examples
//!
//! ```rust,ignore
//! use annotrack_core::features::shared::test_helpers::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let db = TestDb::new().await;
//!     let experiment = TestExperiment::new("baseline").insert(db.pool()).await.unwrap();
//!     let run = TestRun::new(&experiment).with_accuracy(0.9).insert(db.pool()).await.unwrap();
//!     let image = TestImage::new(&run, "/data/cat.png")
//!         .with_attack_type("fgsm")
//!         .insert(db.pool())
//!         .await
//!         .unwrap();
//! }
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::db::{connect, DbConfig};

/// Fresh migrated SQLite database in a temporary directory
///
/// The directory (and database file) is removed when this value is dropped.
pub struct TestDb {
    pool: SqlitePool,
    _dir: TempDir,
}

impl TestDb {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let url = format!("sqlite://{}", dir.path().join("test.db").display());
        let pool = connect(&DbConfig::new(url))
            .await
            .expect("failed to open test database");
        Self { pool, _dir: dir }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Owned handle for passing to `handle(pool, ..)`
    pub fn pool_owned(&self) -> SqlitePool {
        self.pool.clone()
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .expect("count query failed")
    }
}

/// Builder for creating test experiments
#[derive(Debug, Clone)]
pub struct TestExperiment {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_date: NaiveDate,
}

impl TestExperiment {
    pub fn new(name: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            description: None,
            created_date: NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date"),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_created_date(mut self, created_date: NaiveDate) -> Self {
        self.created_date = created_date;
        self
    }

    /// Insert the experiment and record its assigned id
    pub async fn insert(mut self, pool: &SqlitePool) -> sqlx::Result<Self> {
        self.id = sqlx::query_scalar(
            r#"
            INSERT INTO experiments (name, description, created_date)
            VALUES (?, ?, ?)
            RETURNING experiment_id
            "#,
        )
        .bind(&self.name)
        .bind(&self.description)
        .bind(self.created_date)
        .fetch_one(pool)
        .await?;

        Ok(self)
    }
}

/// Builder for creating test runs
#[derive(Debug, Clone)]
pub struct TestRun {
    pub id: i64,
    pub experiment_id: i64,
    pub run_date: DateTime<Utc>,
    pub accuracy: Option<f64>,
    pub flagged: Option<bool>,
}

impl TestRun {
    pub fn new(experiment: &TestExperiment) -> Self {
        Self::for_experiment(experiment.id)
    }

    pub fn for_experiment(experiment_id: i64) -> Self {
        Self {
            id: 0,
            experiment_id,
            run_date: DateTime::parse_from_rfc3339("2024-01-16T10:00:00Z")
                .expect("valid timestamp")
                .with_timezone(&Utc),
            accuracy: None,
            flagged: None,
        }
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    pub fn with_flagged(mut self, flagged: bool) -> Self {
        self.flagged = Some(flagged);
        self
    }

    pub async fn insert(mut self, pool: &SqlitePool) -> sqlx::Result<Self> {
        self.id = sqlx::query_scalar(
            r#"
            INSERT INTO runs (experiment_id, run_date, accuracy, flagged)
            VALUES (?, ?, ?, ?)
            RETURNING run_id
            "#,
        )
        .bind(self.experiment_id)
        .bind(self.run_date)
        .bind(self.accuracy)
        .bind(self.flagged)
        .fetch_one(pool)
        .await?;

        Ok(self)
    }
}

/// Builder for creating test images
#[derive(Debug, Clone)]
pub struct TestImage {
    pub id: i64,
    pub run_id: i64,
    pub file_path: String,
    pub original_name: Option<String>,
    pub attack_type: String,
    pub coordinates: Option<[i64; 4]>,
}

impl TestImage {
    pub fn new(run: &TestRun, file_path: &str) -> Self {
        Self {
            id: 0,
            run_id: run.id,
            file_path: file_path.to_string(),
            original_name: None,
            attack_type: "no_attack".to_string(),
            coordinates: None,
        }
    }

    pub fn with_attack_type(mut self, attack_type: &str) -> Self {
        self.attack_type = attack_type.to_string();
        self
    }

    pub fn with_original_name(mut self, original_name: &str) -> Self {
        self.original_name = Some(original_name.to_string());
        self
    }

    pub fn with_coordinates(mut self, coordinates: [i64; 4]) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    pub async fn insert(mut self, pool: &SqlitePool) -> sqlx::Result<Self> {
        let [x1, y1, x2, y2] = match self.coordinates {
            Some(c) => c.map(Some),
            None => [None; 4],
        };

        self.id = sqlx::query_scalar(
            r#"
            INSERT INTO images (run_id, file_path, original_name, attack_type, x1, y1, x2, y2)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING image_id
            "#,
        )
        .bind(self.run_id)
        .bind(&self.file_path)
        .bind(&self.original_name)
        .bind(&self.attack_type)
        .bind(x1)
        .bind(y1)
        .bind(x2)
        .bind(y2)
        .fetch_one(pool)
        .await?;

        Ok(self)
    }
}
