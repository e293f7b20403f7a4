//! `annotrack image ...`

use annotrack_core::cqrs::middleware::{log_command, log_query};
use annotrack_core::features::images::{
    commands, queries, CreateImageCommand, DeleteImageCommand, GetImageQuery, ListImagesQuery,
    NextImageIdQuery, UpdateImageCommand,
};
use annotrack_core::features::shared::CoordinateValue;
use sqlx::SqlitePool;

use crate::drawing::{DragGesture, Letterbox, Size};
use crate::output::{image_table, images_table, Printer};
use crate::{CliError, CoordinateArg, ImageCommand, Result};

/// Coordinates typed directly, or translated from a drag over a viewport
fn resolve_coordinates(
    coordinates: Option<&CoordinateArg>,
    drag: Option<DragGesture>,
    viewport: Option<Size>,
    image_size: Option<Size>,
) -> Result<Option<Vec<CoordinateValue>>> {
    if let Some(CoordinateArg(values)) = coordinates {
        return Ok(Some(values.clone()));
    }

    match (drag, viewport, image_size) {
        (Some(drag), Some(viewport), Some(image_size)) => {
            let fit = Letterbox::fit(viewport, image_size)?;
            let rect = fit.translate(drag)?;
            Ok(Some(rect.into_iter().map(CoordinateValue::from).collect()))
        },
        _ => Ok(None),
    }
}

pub async fn run(pool: SqlitePool, command: &ImageCommand, printer: Printer) -> Result<()> {
    match command {
        ImageCommand::Add {
            run_id,
            file_path,
            original_name,
            attack_type,
            added_date,
            coordinates,
            drag,
            viewport,
            image_size,
        } => {
            let coordinates =
                resolve_coordinates(coordinates.as_ref(), *drag, *viewport, *image_size)?;

            let command = CreateImageCommand {
                run_id: *run_id,
                file_path: file_path.clone(),
                original_name: original_name.clone(),
                attack_type: *attack_type,
                added_date: *added_date,
                coordinates,
            };
            log_command(&command);

            let image = commands::create::handle(pool, command)
                .await
                .map_err(CliError::operation)?;
            printer.show(&image, image_table)
        },

        ImageCommand::List {
            attack_type,
            run,
            experiment,
            sort_experiment,
            sort_run,
            sort_id,
        } => {
            let query = ListImagesQuery {
                attack_type: *attack_type,
                run_id: *run,
                experiment_id: *experiment,
                sort_id: *sort_id,
                sort_run_id: *sort_run,
                sort_experiment_id: *sort_experiment,
            };
            log_query(&query);

            let response = queries::list::handle(pool, query)
                .await
                .map_err(CliError::operation)?;
            printer.show(&response.items, |items| images_table(items))
        },

        ImageCommand::Show { id } => {
            let query = GetImageQuery { id: *id };
            log_query(&query);

            let image = queries::get::handle(pool, query)
                .await
                .map_err(CliError::operation)?;
            printer.show(&image, image_table)
        },

        ImageCommand::Update {
            id,
            file_path,
            original_name,
            attack_type,
            coordinates,
            clear_coordinates,
        } => {
            let command = UpdateImageCommand {
                id: *id,
                file_path: file_path.clone(),
                original_name: original_name.clone(),
                attack_type: *attack_type,
                coordinates: coordinates.as_ref().map(|c| c.0.clone()),
                clear_coordinates: *clear_coordinates,
            };
            log_command(&command);

            let image = commands::update::handle(pool, command)
                .await
                .map_err(CliError::operation)?;
            printer.show(&image, image_table)
        },

        ImageCommand::Delete { id } => {
            let command = DeleteImageCommand { id: *id };
            log_command(&command);

            let response = commands::delete::handle(pool, command)
                .await
                .map_err(CliError::operation)?;
            printer.done(&response, &format!("Deleted image {}", response.id))
        },

        ImageCommand::NextId => {
            let query = NextImageIdQuery {};
            log_query(&query);

            let response = queries::next_id::handle(pool, query)
                .await
                .map_err(CliError::operation)?;
            printer.plain(&response, response.next_id)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_coordinates_win() {
        let typed = CoordinateArg(vec![CoordinateValue::Integer(1); 4]);
        let resolved = resolve_coordinates(Some(&typed), None, None, None).unwrap();
        assert_eq!(resolved, Some(typed.0));
    }

    #[test]
    fn test_drag_is_translated_to_native_pixels() {
        let drag: DragGesture = "100,50,0,250".parse().unwrap();
        let resolved = resolve_coordinates(
            None,
            Some(drag),
            Some(Size::new(400, 300)),
            Some(Size::new(800, 600)),
        )
        .unwrap()
        .unwrap();

        let expected: Vec<CoordinateValue> =
            [0i64, 100, 200, 500].into_iter().map(CoordinateValue::from).collect();
        assert_eq!(resolved, expected);
    }

    #[test]
    fn test_drag_outside_image_is_validation_error() {
        let drag: DragGesture = "0,0,10,10".parse().unwrap();
        let err = resolve_coordinates(
            None,
            Some(drag),
            Some(Size::new(400, 400)),
            Some(Size::new(800, 400)),
        )
        .unwrap_err();
        assert_eq!(err.kind(), annotrack_core::ErrorKind::Validation);
    }

    #[test]
    fn test_no_geometry_means_no_box() {
        assert_eq!(resolve_coordinates(None, None, None, None).unwrap(), None);
    }
}
