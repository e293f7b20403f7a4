//! CLI command implementations
//!
//! Each subcommand group has its own module with a `run` function that
//! builds core commands/queries and hands them to their handlers.

pub mod attack_types;
pub mod experiment;
pub mod image;
pub mod run;
