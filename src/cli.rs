// src/cli.rs
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "A CLI tool to log workouts in a local JSON store", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the workout log (the indices printed here are what the
    /// positional commands below consume)
    List,
    /// Quick-add a workout: one exercise with N identical sets
    Add {
        /// Name of the exercise (e.g., "Bench Press")
        #[arg(short, long)]
        exercise: String,

        /// Name of the workout session (config default when omitted)
        #[arg(short = 'n', long)]
        workout_name: Option<String>,

        /// Date of the session (YYYY-MM-DD, today when omitted)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Comma-separated muscle groups (e.g., "chest,triceps")
        #[arg(short, long)]
        muscles: Option<String>,

        /// Number of sets performed (config default when omitted)
        #[arg(short, long)]
        sets: Option<u32>,

        /// Repetitions per set
        #[arg(short, long, default_value_t = 1)]
        reps: u32,

        /// Weight used per set
        #[arg(short, long)]
        weight: Option<f64>,

        /// Additional notes about the exercise
        #[arg(long)]
        notes: Option<String>,
    },
    /// Append a new muscle-group section with one starter row
    AddGroup {
        /// Muscle group name (first known group when omitted)
        group: Option<String>,
    },
    /// Append a row to an existing section
    AddRow {
        /// Section index as shown by `list`
        group: usize,
    },
    /// Reassign a section to another muscle group; exercises the new group
    /// does not list are reset to its first exercise
    SetGroup {
        /// Section index as shown by `list`
        group: usize,
        /// New muscle group name
        name: String,
    },
    /// Edit one field of a row
    Edit {
        /// Section index as shown by `list`
        group: usize,
        /// Row index within the section
        row: usize,
        /// New date for the row (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// New exercise name for the row
        #[arg(long)]
        exercise: Option<String>,
        /// Set slot to edit (1-based)
        #[arg(long, value_name = "SLOT")]
        set: Option<usize>,
        /// New repetitions for the chosen set slot
        #[arg(long, requires = "set")]
        reps: Option<u32>,
        /// New weight for the chosen set slot
        #[arg(long, requires = "set", conflicts_with = "clear_weight")]
        weight: Option<f64>,
        /// Remove the weight of the chosen set slot
        #[arg(long, requires = "set")]
        clear_weight: bool,
    },
    /// Delete a row by position (later rows shift down)
    DeleteRow {
        /// Section index as shown by `list`
        group: usize,
        /// Row index within the section
        row: usize,
    },
    /// Delete a whole section by position
    DeleteGroup {
        /// Section index as shown by `list`
        group: usize,
    },
    /// Insert the demonstration workout at the head of the log
    Seed,
    /// Import a previously exported JSON or CSV artifact (dispatched by
    /// file extension)
    Import {
        /// Path of the artifact to import
        file: PathBuf,
    },
    /// Write the whole log as pretty-printed JSON
    ExportJson {
        /// Output path (defaults to fitness-data.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the log flattened to CSV, one row per set
    ExportCsv {
        /// Output path (defaults to fitness-data.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Remove all locally stored data (prompts for confirmation)
    Clear,
    /// Show the path to the store slot file
    StorePath,
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}
