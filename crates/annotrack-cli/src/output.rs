//! Rendering of query results
//!
//! Tables use comfy-table with the UTF8_FULL preset and round corners;
//! `--json` switches every command to pretty-printed JSON.

use annotrack_core::{AttackType, Experiment, Image, Run};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use serde::Serialize;
use std::fmt;

use crate::Result;

const EMPTY: &str = "-";

/// Where command results go: tables or JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct Printer {
    pub json: bool,
}

impl Printer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print `value` as JSON, or the table built from it
    pub fn show<T: Serialize>(&self, value: &T, table: impl FnOnce(&T) -> Table) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", table(value));
        }
        Ok(())
    }

    /// Print `text` verbatim, or `value` as JSON
    pub fn plain<T: Serialize>(&self, value: &T, text: impl fmt::Display) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text);
        }
        Ok(())
    }

    /// Print a confirmation line, or `value` as JSON
    pub fn done<T: Serialize>(&self, value: &T, message: &str) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            use colored::Colorize;
            println!("{} {}", "✓".green(), message);
        }
        Ok(())
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).apply_modifier(UTF8_ROUND_CORNERS);
    table
}

fn or_empty<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| EMPTY.to_string())
}

fn format_flag(flagged: Option<bool>) -> String {
    match flagged {
        Some(true) => "yes".to_string(),
        Some(false) => "no".to_string(),
        None => EMPTY.to_string(),
    }
}

fn format_accuracy(accuracy: Option<f64>) -> String {
    accuracy
        .map(|a| format!("{:.4}", a))
        .unwrap_or_else(|| EMPTY.to_string())
}

pub fn experiments_table(experiments: &[Experiment]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["ID", "Name", "Description", "Created"]);

    for experiment in experiments {
        table.add_row(vec![
            experiment.id.to_string(),
            experiment.name.clone(),
            or_empty(experiment.description.as_deref()),
            experiment.created_date.to_string(),
        ]);
    }

    table
}

pub fn experiment_table(experiment: &Experiment) -> Table {
    let mut table = new_table();
    table.add_row(vec!["ID".to_string(), experiment.id.to_string()]);
    table.add_row(vec!["Name".to_string(), experiment.name.clone()]);
    table.add_row(vec![
        "Description".to_string(),
        or_empty(experiment.description.as_deref()),
    ]);
    table.add_row(vec!["Created".to_string(), experiment.created_date.to_string()]);
    table
}

pub fn runs_table(runs: &[Run]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["ID", "Experiment", "Date", "Accuracy", "Flagged"]);

    for run in runs {
        table.add_row(vec![
            run.id.to_string(),
            run.experiment_id.to_string(),
            run.run_date.format("%Y-%m-%d %H:%M:%S").to_string(),
            format_accuracy(run.accuracy),
            format_flag(run.flagged),
        ]);
    }

    table
}

pub fn run_table(run: &Run) -> Table {
    let mut table = new_table();
    table.add_row(vec!["ID".to_string(), run.id.to_string()]);
    table.add_row(vec!["Experiment".to_string(), run.experiment_id.to_string()]);
    table.add_row(vec!["Date".to_string(), run.run_date.to_rfc3339()]);
    table.add_row(vec!["Accuracy".to_string(), format_accuracy(run.accuracy)]);
    table.add_row(vec!["Flagged".to_string(), format_flag(run.flagged)]);
    table
}

pub fn images_table(images: &[Image]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "ID",
        "Run",
        "Experiment",
        "File",
        "Original name",
        "Attack",
        "Box",
    ]);

    for image in images {
        table.add_row(vec![
            image.id.to_string(),
            image.run_id.to_string(),
            image.experiment_id.to_string(),
            image.file_path.clone(),
            or_empty(image.original_name.as_deref()),
            image.attack_type.to_string(),
            or_empty(image.coordinates),
        ]);
    }

    table
}

pub fn image_table(image: &Image) -> Table {
    let mut table = new_table();
    table.add_row(vec!["ID".to_string(), image.id.to_string()]);
    table.add_row(vec!["Run".to_string(), image.run_id.to_string()]);
    table.add_row(vec!["Experiment".to_string(), image.experiment_id.to_string()]);
    table.add_row(vec!["File".to_string(), image.file_path.clone()]);
    table.add_row(vec![
        "Original name".to_string(),
        or_empty(image.original_name.as_deref()),
    ]);
    table.add_row(vec![
        "Attack".to_string(),
        format!("{} ({})", image.attack_type.label(), image.attack_type),
    ]);
    table.add_row(vec![
        "Added".to_string(),
        or_empty(image.added_date.map(|d| d.to_rfc3339())),
    ]);
    table.add_row(vec!["Box".to_string(), or_empty(image.coordinates)]);
    table
}

pub fn attack_types_table(attack_types: &[AttackType]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Value", "Label"]);
    for attack_type in attack_types {
        table.add_row(vec![attack_type.as_str(), attack_type.label()]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn experiment() -> Experiment {
        Experiment {
            id: 4,
            name: "baseline".to_string(),
            description: None,
            created_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        }
    }

    #[test]
    fn test_experiments_table_shows_rows() {
        let rendered = experiments_table(&[experiment()]).to_string();
        assert!(rendered.contains("baseline"));
        assert!(rendered.contains("2024-01-15"));
        assert!(rendered.contains("Description"));
    }

    #[test]
    fn test_run_table_formats_optional_fields() {
        let run = Run {
            id: 2,
            experiment_id: 4,
            run_date: Utc.with_ymd_and_hms(2024, 1, 16, 10, 0, 0).unwrap(),
            accuracy: Some(0.5),
            flagged: None,
        };

        let rendered = runs_table(&[run]).to_string();
        assert!(rendered.contains("2024-01-16 10:00:00"));
        assert!(rendered.contains("0.5000"));
        assert!(rendered.contains(EMPTY));
    }

    #[test]
    fn test_attack_types_table_lists_all() {
        let rendered = attack_types_table(&AttackType::ALL).to_string();
        for attack_type in AttackType::ALL {
            assert!(rendered.contains(attack_type.as_str()));
        }
    }

    #[test]
    fn test_flag_formatting() {
        assert_eq!(format_flag(Some(true)), "yes");
        assert_eq!(format_flag(Some(false)), "no");
        assert_eq!(format_flag(None), "-");
    }
}
