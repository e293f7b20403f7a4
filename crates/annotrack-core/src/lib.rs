//! Annotrack Core Library
//!
//! Storage and validation for an image-annotation experiment tracker.
//!
//! # Overview
//!
//! Three entities form a strict hierarchy:
//!
//! - **Experiment**: a named container with a creation date
//! - **Run**: one execution of an experiment, with optional accuracy and flag
//! - **Image**: an annotated file produced by a run, labelled with an attack
//!   type and an optional bounding box
//!
//! Every write is validated before it reaches the store. Runs and images must
//! reference an existing parent; deleting a parent cascades to its children.
//!
//! # Architecture
//!
//! The crate follows a **CQRS (Command Query Responsibility Segregation)** layout:
//!
//! - **Commands** (write operations): create, update, delete
//! - **Queries** (read operations): get, list, next id
//!
//! Each operation lives in `features/<entity>/{commands,queries}/` as a plain
//! request struct plus a standalone `handle(pool, request)` function.
//!
//! # Example
//!
//! ```no_run
//! use annotrack_core::{config::Config, db};
//! use annotrack_core::features::experiments::{commands, CreateExperimentCommand};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::connect(&config.database).await?;
//!
//!     let experiment =
//!         commands::create::handle(pool, CreateExperimentCommand::new("baseline")).await?;
//!     println!("created experiment {}", experiment.id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod cqrs;
pub mod db;
pub mod error;
pub mod features;
pub mod models;

pub use config::Config;
pub use error::{Classify, ErrorKind};
pub use models::{AttackType, BoundingBox, Experiment, Image, Run, SortDirection};
