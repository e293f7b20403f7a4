//! Runs: single executions of an experiment

pub mod commands;
pub mod queries;

pub use commands::{
    CreateRunCommand, CreateRunError, DeleteRunCommand, DeleteRunError, DeleteRunResponse,
    UpdateRunCommand, UpdateRunError,
};

pub use queries::{
    GetRunError, GetRunQuery, ListRunsError, ListRunsQuery, ListRunsResponse, NextRunIdQuery,
};
