//! Annotrack CLI Library
//!
//! Command-line front end for the annotation experiment tracker.
//!
//! # Overview
//!
//! - **Experiments**: `annotrack experiment add|list|show|update|delete|next-id`
//! - **Runs**: `annotrack run add|list|show|update|delete|next-id`
//! - **Images**: `annotrack image add|list|show|update|delete|next-id`
//! - **Attack types**: `annotrack attack-types`
//!
//! Arguments are pre-validated by clap value parsers before a command is
//! built; the store-side rules are enforced again by `annotrack-core`.

pub mod commands;
pub mod drawing;
pub mod error;
pub mod output;

// Re-export commonly used types
pub use error::{CliError, Result};

use annotrack_core::features::shared::validation::{
    parse_accuracy, parse_coordinate_list, parse_date, parse_flagged, parse_timestamp,
    CoordinatesValidationError,
};
use annotrack_core::features::shared::CoordinateValue;
use annotrack_core::{AttackType, SortDirection};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use drawing::{DragGesture, Size};

/// Annotrack - image annotation experiment tracker
#[derive(Parser, Debug)]
#[command(name = "annotrack")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print captured log lines after the command finishes
    #[arg(long, global = true)]
    pub show_log: bool,

    /// Render results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Database URL (defaults to sqlite://annotrack.db)
    #[arg(long, env = "ANNOTRACK_DATABASE_URL", global = true)]
    pub database_url: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage experiments
    Experiment {
        #[command(subcommand)]
        command: ExperimentCommand,
    },

    /// Manage runs of an experiment
    Run {
        #[command(subcommand)]
        command: RunCommand,
    },

    /// Manage annotated images
    Image {
        #[command(subcommand)]
        command: ImageCommand,
    },

    /// List the supported attack types
    AttackTypes,
}

/// Experiment subcommands
#[derive(Subcommand, Debug)]
pub enum ExperimentCommand {
    /// Create an experiment
    Add {
        /// Experiment name
        name: String,

        /// Free-form description
        #[arg(short, long)]
        description: Option<String>,

        /// Creation date (YYYY-MM-DD, defaults to today)
        #[arg(long, value_parser = parse_date)]
        created_date: Option<NaiveDate>,
    },

    /// List all experiments
    List,

    /// Show one experiment
    Show {
        /// Experiment ID
        id: i64,
    },

    /// Change an experiment's name or description
    Update {
        /// Experiment ID
        id: i64,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New description (an empty value clears it)
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete an experiment with its runs and images
    Delete {
        /// Experiment ID
        id: i64,
    },

    /// Print the ID the next experiment is likely to get
    NextId,
}

/// Run subcommands
#[derive(Subcommand, Debug)]
pub enum RunCommand {
    /// Record a run of an experiment
    Add {
        /// Parent experiment ID
        experiment_id: i64,

        /// Run timestamp (RFC 3339, defaults to now)
        #[arg(long, value_parser = parse_timestamp)]
        run_date: Option<DateTime<Utc>>,

        /// Accuracy between 0 and 1
        #[arg(short, long, value_parser = parse_accuracy)]
        accuracy: Option<f64>,

        /// Flag the run for review (true or false)
        #[arg(short, long, value_parser = parse_flagged)]
        flagged: Option<bool>,
    },

    /// List runs
    List {
        /// Only runs of this experiment
        #[arg(short, long)]
        experiment: Option<i64>,
    },

    /// Show one run
    Show {
        /// Run ID
        id: i64,
    },

    /// Change a run's accuracy or flag
    Update {
        /// Run ID
        id: i64,

        /// Accuracy between 0 and 1
        #[arg(short, long, value_parser = parse_accuracy)]
        accuracy: Option<f64>,

        /// Flag the run for review (true or false)
        #[arg(short, long, value_parser = parse_flagged)]
        flagged: Option<bool>,

        /// Reset accuracy to unknown
        #[arg(long, conflicts_with = "accuracy")]
        clear_accuracy: bool,

        /// Reset the flagged marker to unknown
        #[arg(long, conflicts_with = "flagged")]
        clear_flagged: bool,
    },

    /// Delete a run and its images
    Delete {
        /// Run ID
        id: i64,
    },

    /// Print the ID the next run is likely to get
    NextId,
}

/// Image subcommands
#[derive(Subcommand, Debug)]
pub enum ImageCommand {
    /// Register an annotated image
    Add {
        /// Parent run ID
        run_id: i64,

        /// Path of the image file
        file_path: String,

        /// Original file name
        #[arg(short = 'n', long)]
        original_name: Option<String>,

        /// Attack type (see `annotrack attack-types`)
        #[arg(short, long, default_value = "no_attack")]
        attack_type: AttackType,

        /// When the image was added (RFC 3339)
        #[arg(long, value_parser = parse_timestamp)]
        added_date: Option<DateTime<Utc>>,

        /// Bounding box in native pixels: x1,y1,x2,y2
        #[arg(short, long, value_parser = parse_coordinates_arg, allow_hyphen_values = true, conflicts_with = "drag")]
        coordinates: Option<CoordinateArg>,

        /// Drag gesture in viewport pixels: x1,y1,x2,y2
        #[arg(long, allow_hyphen_values = true, requires_all = ["viewport", "image_size"])]
        drag: Option<DragGesture>,

        /// Size of the viewport the image was shown in: WxH
        #[arg(long, requires = "drag")]
        viewport: Option<Size>,

        /// Native size of the image: WxH
        #[arg(long, requires = "drag")]
        image_size: Option<Size>,
    },

    /// List images
    List {
        /// Only images with this attack type
        #[arg(short, long)]
        attack_type: Option<AttackType>,

        /// Only images of this run
        #[arg(short, long)]
        run: Option<i64>,

        /// Only images of this experiment
        #[arg(short, long)]
        experiment: Option<i64>,

        /// Order by experiment ID (asc or desc)
        #[arg(long)]
        sort_experiment: Option<SortDirection>,

        /// Order by run ID (asc or desc)
        #[arg(long)]
        sort_run: Option<SortDirection>,

        /// Order by image ID (asc or desc)
        #[arg(long)]
        sort_id: Option<SortDirection>,
    },

    /// Show one image
    Show {
        /// Image ID
        id: i64,
    },

    /// Change an image's fields
    Update {
        /// Image ID
        id: i64,

        /// New file path
        #[arg(long)]
        file_path: Option<String>,

        /// New original name (an empty value clears it)
        #[arg(short = 'n', long)]
        original_name: Option<String>,

        /// New attack type
        #[arg(short, long)]
        attack_type: Option<AttackType>,

        /// New bounding box: x1,y1,x2,y2
        #[arg(short, long, value_parser = parse_coordinates_arg, allow_hyphen_values = true)]
        coordinates: Option<CoordinateArg>,

        /// Remove the bounding box
        #[arg(long, conflicts_with = "coordinates")]
        clear_coordinates: bool,
    },

    /// Delete an image
    Delete {
        /// Image ID
        id: i64,
    },

    /// Print the ID the next image is likely to get
    NextId,
}

/// Comma-separated coordinate list as typed on the command line
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateArg(pub Vec<CoordinateValue>);

fn parse_coordinates_arg(input: &str) -> std::result::Result<CoordinateArg, CoordinatesValidationError> {
    parse_coordinate_list(input).map(CoordinateArg)
}
