pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateExperimentCommand, CreateExperimentError, NewExperiment};
pub use delete::{DeleteExperimentCommand, DeleteExperimentError, DeleteExperimentResponse};
pub use update::{ExperimentChanges, UpdateExperimentCommand, UpdateExperimentError};
