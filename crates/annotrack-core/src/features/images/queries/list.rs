//! List images with optional filters and multi-key sorting
//!
//! Sort keys apply in a fixed precedence (experiment, run, image id) and the
//! result always ends with `image_id ASC` so equal keys keep a stable order.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::{classify_sqlx, Classify, ErrorKind};
use crate::models::{AttackType, Image, SortDirection, IMAGE_SELECT};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListImagesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_type: Option<AttackType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiment_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_id: Option<SortDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_run_id: Option<SortDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_experiment_id: Option<SortDirection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListImagesResponse {
    pub items: Vec<Image>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListImagesError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ListImagesResponse, ListImagesError>> for ListImagesQuery {}

impl crate::cqrs::middleware::Query for ListImagesQuery {}

impl Classify for ListImagesError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Database(e) => classify_sqlx(e),
        }
    }
}

impl ListImagesQuery {
    /// ORDER BY terms in precedence order
    fn order_terms(&self) -> Vec<String> {
        let mut terms = Vec::with_capacity(4);
        if let Some(direction) = self.sort_experiment_id {
            terms.push(format!("r.experiment_id {}", direction.as_sql()));
        }
        if let Some(direction) = self.sort_run_id {
            terms.push(format!("i.run_id {}", direction.as_sql()));
        }
        match self.sort_id {
            Some(direction) => terms.push(format!("i.image_id {}", direction.as_sql())),
            None => terms.push("i.image_id ASC".to_string()),
        }
        terms
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    query: ListImagesQuery,
) -> Result<ListImagesResponse, ListImagesError> {
    let mut builder = QueryBuilder::<Sqlite>::new(IMAGE_SELECT);
    builder.push(" WHERE 1 = 1");

    if let Some(attack_type) = query.attack_type {
        builder.push(" AND i.attack_type = ").push_bind(attack_type.as_str());
    }
    if let Some(run_id) = query.run_id {
        builder.push(" AND i.run_id = ").push_bind(run_id);
    }
    if let Some(experiment_id) = query.experiment_id {
        builder.push(" AND r.experiment_id = ").push_bind(experiment_id);
    }

    builder.push(" ORDER BY ");
    builder.push(query.order_terms().join(", "));

    let items = builder.build_query_as::<Image>().fetch_all(&pool).await?;

    tracing::debug!(count = items.len(), "Listed images");

    Ok(ListImagesResponse { items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{TestDb, TestExperiment, TestImage, TestRun};

    struct Seed {
        db: TestDb,
        experiments: Vec<TestExperiment>,
        runs: Vec<TestRun>,
        images: Vec<TestImage>,
    }

    /// exp0: run0 (img0 no_attack, img1 fgsm), exp1: run1 (img2 no_attack), exp0: run2 (img3 pgd)
    async fn seed() -> Seed {
        let db = TestDb::new().await;
        let e0 = TestExperiment::new("e0").insert(db.pool()).await.unwrap();
        let e1 = TestExperiment::new("e1").insert(db.pool()).await.unwrap();
        let r0 = TestRun::new(&e0).insert(db.pool()).await.unwrap();
        let r1 = TestRun::new(&e1).insert(db.pool()).await.unwrap();
        let r2 = TestRun::new(&e0).insert(db.pool()).await.unwrap();

        let mut images = Vec::new();
        for (run, attack) in [(&r0, "no_attack"), (&r0, "fgsm"), (&r1, "no_attack"), (&r2, "pgd")] {
            images.push(
                TestImage::new(run, "/img.png")
                    .with_attack_type(attack)
                    .insert(db.pool())
                    .await
                    .unwrap(),
            );
        }

        Seed {
            db,
            experiments: vec![e0, e1],
            runs: vec![r0, r1, r2],
            images,
        }
    }

    fn ids(response: &ListImagesResponse) -> Vec<i64> {
        response.items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_default_order_is_image_id_ascending() {
        assert_eq!(ListImagesQuery::default().order_terms(), vec!["i.image_id ASC"]);
    }

    #[test]
    fn test_order_precedence() {
        let query = ListImagesQuery {
            sort_id: Some(SortDirection::Desc),
            sort_experiment_id: Some(SortDirection::Desc),
            sort_run_id: Some(SortDirection::Asc),
            ..Default::default()
        };
        assert_eq!(
            query.order_terms(),
            vec!["r.experiment_id DESC", "i.run_id ASC", "i.image_id DESC"]
        );
    }

    #[tokio::test]
    async fn test_filter_by_attack_type() {
        let seed = seed().await;
        let response = handle(
            seed.db.pool_owned(),
            ListImagesQuery {
                attack_type: Some(AttackType::NoAttack),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(ids(&response), vec![seed.images[0].id, seed.images[2].id]);
        assert!(response.items.iter().all(|i| i.attack_type == AttackType::NoAttack));
    }

    #[tokio::test]
    async fn test_filter_by_experiment_through_run() {
        let seed = seed().await;
        let response = handle(
            seed.db.pool_owned(),
            ListImagesQuery {
                experiment_id: Some(seed.experiments[0].id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(
            ids(&response),
            vec![seed.images[0].id, seed.images[1].id, seed.images[3].id]
        );
        assert!(response.items.iter().all(|i| i.experiment_id == seed.experiments[0].id));
    }

    #[tokio::test]
    async fn test_filter_by_run() {
        let seed = seed().await;
        let response = handle(
            seed.db.pool_owned(),
            ListImagesQuery {
                run_id: Some(seed.runs[2].id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(ids(&response), vec![seed.images[3].id]);
    }

    #[tokio::test]
    async fn test_sort_by_experiment_desc_breaks_ties_by_id() {
        let seed = seed().await;
        let response = handle(
            seed.db.pool_owned(),
            ListImagesQuery {
                sort_experiment_id: Some(SortDirection::Desc),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(
            ids(&response),
            vec![
                seed.images[2].id,
                seed.images[0].id,
                seed.images[1].id,
                seed.images[3].id
            ]
        );
    }

    #[tokio::test]
    async fn test_sort_by_run_desc_then_id_desc() {
        let seed = seed().await;
        let response = handle(
            seed.db.pool_owned(),
            ListImagesQuery {
                sort_run_id: Some(SortDirection::Desc),
                sort_id: Some(SortDirection::Desc),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(
            ids(&response),
            vec![
                seed.images[3].id,
                seed.images[2].id,
                seed.images[1].id,
                seed.images[0].id
            ]
        );
    }
}
