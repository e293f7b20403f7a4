//! `annotrack run ...`

use annotrack_core::cqrs::middleware::{log_command, log_query};
use annotrack_core::features::runs::{
    commands, queries, CreateRunCommand, DeleteRunCommand, GetRunQuery, ListRunsQuery,
    NextRunIdQuery, UpdateRunCommand,
};
use sqlx::SqlitePool;

use crate::output::{run_table, runs_table, Printer};
use crate::{CliError, Result, RunCommand};

pub async fn run(pool: SqlitePool, command: &RunCommand, printer: Printer) -> Result<()> {
    match command {
        RunCommand::Add {
            experiment_id,
            run_date,
            accuracy,
            flagged,
        } => {
            let command = CreateRunCommand {
                experiment_id: *experiment_id,
                run_date: *run_date,
                accuracy: *accuracy,
                flagged: *flagged,
            };
            log_command(&command);

            let run = commands::create::handle(pool, command)
                .await
                .map_err(CliError::operation)?;
            printer.show(&run, run_table)
        },

        RunCommand::List { experiment } => {
            let query = ListRunsQuery {
                experiment_id: *experiment,
            };
            log_query(&query);

            let response = queries::list::handle(pool, query)
                .await
                .map_err(CliError::operation)?;
            printer.show(&response.items, |items| runs_table(items))
        },

        RunCommand::Show { id } => {
            let query = GetRunQuery { id: *id };
            log_query(&query);

            let run = queries::get::handle(pool, query)
                .await
                .map_err(CliError::operation)?;
            printer.show(&run, run_table)
        },

        RunCommand::Update {
            id,
            accuracy,
            flagged,
            clear_accuracy,
            clear_flagged,
        } => {
            let command = UpdateRunCommand {
                id: *id,
                accuracy: *accuracy,
                flagged: *flagged,
                clear_accuracy: *clear_accuracy,
                clear_flagged: *clear_flagged,
            };
            log_command(&command);

            let run = commands::update::handle(pool, command)
                .await
                .map_err(CliError::operation)?;
            printer.show(&run, run_table)
        },

        RunCommand::Delete { id } => {
            let command = DeleteRunCommand { id: *id };
            log_command(&command);

            let response = commands::delete::handle(pool, command)
                .await
                .map_err(CliError::operation)?;
            printer.done(
                &response,
                &format!(
                    "Deleted run {} ({} images removed)",
                    response.id, response.images_removed
                ),
            )
        },

        RunCommand::NextId => {
            let query = NextRunIdQuery {};
            log_query(&query);

            let response = queries::next_id::handle(pool, query)
                .await
                .map_err(CliError::operation)?;
            printer.plain(&response, response.next_id)
        },
    }
}
