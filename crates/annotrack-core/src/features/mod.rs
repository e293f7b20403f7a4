//! Feature modules implementing the Annotrack operations
//!
//! Each feature is a vertical slice following the CQRS (Command Query
//! Responsibility Segregation) pattern.
//!
//! # Features
//!
//! - **experiments**: Experiment CRUD
//! - **runs**: Run CRUD, scoped to an experiment
//! - **images**: Image CRUD with attack-type labels and bounding boxes
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations (create, update, delete)
//! - `queries/` - Read operations (get, list, next id)
//!
//! Every command and query is a plain data struct with a `validate()` method
//! and a standalone `handle(pool, request)` function. They implement the
//! mediator `Request` trait so front-ends can dispatch them through
//! [`crate::cqrs::build_mediator`].

pub mod experiments;
pub mod images;
pub mod runs;
pub mod shared;
