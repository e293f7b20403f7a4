//! `annotrack experiment ...`

use annotrack_core::cqrs::middleware::{log_command, log_query};
use annotrack_core::features::experiments::{
    commands, queries, CreateExperimentCommand, DeleteExperimentCommand, GetExperimentQuery,
    ListExperimentsQuery, NextExperimentIdQuery, UpdateExperimentCommand,
};
use sqlx::SqlitePool;

use crate::output::{experiment_table, experiments_table, Printer};
use crate::{CliError, ExperimentCommand, Result};

pub async fn run(pool: SqlitePool, command: &ExperimentCommand, printer: Printer) -> Result<()> {
    match command {
        ExperimentCommand::Add {
            name,
            description,
            created_date,
        } => {
            let command = CreateExperimentCommand {
                name: name.clone(),
                description: description.clone(),
                created_date: *created_date,
            };
            log_command(&command);

            let experiment = commands::create::handle(pool, command)
                .await
                .map_err(CliError::operation)?;
            printer.show(&experiment, experiment_table)
        },

        ExperimentCommand::List => {
            let query = ListExperimentsQuery::default();
            log_query(&query);

            let response = queries::list::handle(pool, query)
                .await
                .map_err(CliError::operation)?;
            printer.show(&response.items, |items| experiments_table(items))
        },

        ExperimentCommand::Show { id } => {
            let query = GetExperimentQuery { id: *id };
            log_query(&query);

            let experiment = queries::get::handle(pool, query)
                .await
                .map_err(CliError::operation)?;
            printer.show(&experiment, experiment_table)
        },

        ExperimentCommand::Update {
            id,
            name,
            description,
        } => {
            let command = UpdateExperimentCommand {
                id: *id,
                name: name.clone(),
                description: description.clone(),
            };
            log_command(&command);

            let experiment = commands::update::handle(pool, command)
                .await
                .map_err(CliError::operation)?;
            printer.show(&experiment, experiment_table)
        },

        ExperimentCommand::Delete { id } => {
            let command = DeleteExperimentCommand { id: *id };
            log_command(&command);

            let response = commands::delete::handle(pool, command)
                .await
                .map_err(CliError::operation)?;
            printer.done(
                &response,
                &format!(
                    "Deleted experiment {} ({} runs, {} images removed)",
                    response.id, response.runs_removed, response.images_removed
                ),
            )
        },

        ExperimentCommand::NextId => {
            let query = NextExperimentIdQuery {};
            log_query(&query);

            let response = queries::next_id::handle(pool, query)
                .await
                .map_err(CliError::operation)?;
            printer.plain(&response, response.next_id)
        },
    }
}
