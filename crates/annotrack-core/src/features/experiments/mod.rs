//! Experiments: top-level containers for runs

pub mod commands;
pub mod queries;

pub use commands::{
    CreateExperimentCommand, CreateExperimentError, DeleteExperimentCommand,
    DeleteExperimentError, DeleteExperimentResponse, UpdateExperimentCommand,
    UpdateExperimentError,
};

pub use queries::{
    GetExperimentError, GetExperimentQuery, ListExperimentsError, ListExperimentsQuery,
    ListExperimentsResponse, NextExperimentIdQuery,
};
