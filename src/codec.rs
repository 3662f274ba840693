// src/codec.rs
use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use csv::QuoteStyle;
use thiserror::Error;

use crate::model::{Document, Entry, SetRecord, Workout};

/// Column order of the flattened CSV artifact, one row per set.
pub const CSV_COLUMNS: [&str; 9] = [
    "date",
    "workout_name",
    "exercise_name",
    "set_index",
    "reps",
    "weight",
    "muscles",
    "notes",
    "created_at",
];

pub const JSON_EXPORT_FILE_NAME: &str = "fitness-data.json";
pub const CSV_EXPORT_FILE_NAME: &str = "fitness-data.csv";

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Import is not valid JSON: {0}")]
    InvalidJson(serde_json::Error),
    #[error("JSON import is missing a top-level `workouts` array; nothing was imported.")]
    MissingWorkouts,
    #[error("JSON `workouts` is not an array of workouts: {0}")]
    MalformedWorkouts(serde_json::Error),
    #[error("Failed to serialize workout document: {0}")]
    Serialize(serde_json::Error),
    #[error("CSV import has no header row.")]
    EmptyCsv,
    #[error("CSV header is missing the `{0}` column.")]
    MissingColumn(&'static str),
    #[error("Failed to write CSV: {0}")]
    CsvWrite(#[from] csv::Error),
}

// ---- JSON ----

/// Serializes the whole document, pretty-printed, for the export artifact.
pub fn to_json(document: &Document) -> Result<String, CodecError> {
    serde_json::to_string_pretty(document).map_err(CodecError::Serialize)
}

/// Parses an import artifact down to its workout list. The top-level
/// `workouts` field must exist and be an array; anything else is rejected
/// without side effects. Individual workouts may be partial: absent fields
/// take their defaults (fresh ids, current timestamps, empty lists).
pub fn workouts_from_json(text: &str) -> Result<Vec<Workout>, CodecError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(CodecError::InvalidJson)?;
    let workouts = value.get("workouts").ok_or(CodecError::MissingWorkouts)?;
    if !workouts.is_array() {
        return Err(CodecError::MissingWorkouts);
    }
    serde_json::from_value(workouts.clone()).map_err(CodecError::MalformedWorkouts)
}

// ---- CSV ----

/// Flattens the document to one row per set. Every field is double-quoted
/// with internal quotes doubled; entries and workouts without sets
/// contribute no rows and do not survive a CSV round trip.
pub fn to_csv(document: &Document) -> Result<String, CodecError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());
    writer.write_record(CSV_COLUMNS)?;

    for workout in &document.workouts {
        for entry in &workout.entries {
            let date = entry.effective_date(workout.date).to_rfc3339();
            for set in &entry.sets {
                writer.write_record(&[
                    date.clone(),
                    workout.name.clone(),
                    entry.name.clone(),
                    set.set_index.to_string(),
                    set.reps.to_string(),
                    set.weight.map_or(String::new(), |w| w.to_string()),
                    entry.muscles.join(";"),
                    entry.notes.clone(),
                    entry.created_at.to_rfc3339(),
                ])?;
            }
        }
    }

    writer.flush().map_err(csv::Error::from)?;
    let bytes = writer
        .into_inner()
        .map_err(|err| CodecError::CsvWrite(err.into_error().into()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

struct Columns {
    date: usize,
    workout_name: usize,
    exercise_name: usize,
    set_index: Option<usize>,
    reps: Option<usize>,
    weight: Option<usize>,
    muscles: Option<usize>,
    notes: Option<usize>,
    created_at: Option<usize>,
}

impl Columns {
    fn locate(header: &[String]) -> Result<Self, CodecError> {
        let find = |name: &str| header.iter().position(|field| field == name);
        let require =
            |name: &'static str| find(name).ok_or(CodecError::MissingColumn(name));
        Ok(Self {
            date: require("date")?,
            workout_name: require("workout_name")?,
            exercise_name: require("exercise_name")?,
            set_index: find("set_index"),
            reps: find("reps"),
            weight: find("weight"),
            muscles: find("muscles"),
            notes: find("notes"),
            created_at: find("created_at"),
        })
    }
}

/// Rebuilds workouts from a flattened CSV artifact.
///
/// Rows group by `(workout_name, date)` into workouts and by
/// `exercise_name` into entries, both in first-seen order; muscles, notes
/// and created_at are taken from each entry's first row. Every row appends
/// one set. Ids are regenerated throughout; the artifact never carried any.
pub fn workouts_from_csv(text: &str) -> Result<Vec<Workout>, CodecError> {
    let mut lines = text.lines().filter(|line| !line.is_empty());
    let header = parse_csv_line(lines.next().ok_or(CodecError::EmptyCsv)?);
    let columns = Columns::locate(&header)?;

    let mut workouts: Vec<Workout> = Vec::new();
    let mut workout_index: HashMap<(String, String), usize> = HashMap::new();
    let mut entry_index: HashMap<(usize, String), usize> = HashMap::new();

    for line in lines {
        let row = parse_csv_line(line);

        let date_text = field(&row, Some(columns.date)).to_string();
        let workout_name = field(&row, Some(columns.workout_name)).to_string();
        let exercise_name = field(&row, Some(columns.exercise_name)).to_string();

        let workout_key = (workout_name.clone(), date_text.clone());
        let workout_slot = *workout_index.entry(workout_key).or_insert_with(|| {
            let date = parse_timestamp(&date_text).unwrap_or_else(Utc::now);
            workouts.push(Workout::new(workout_name, date, ""));
            workouts.len() - 1
        });

        let entry_key = (workout_slot, exercise_name.clone());
        let entry_slot = *entry_index.entry(entry_key).or_insert_with(|| {
            let muscles = field(&row, columns.muscles)
                .split(';')
                .filter(|muscle| !muscle.is_empty())
                .map(str::to_string)
                .collect();
            let mut entry = Entry::new(exercise_name, muscles, field(&row, columns.notes));
            if let Some(created_at) = parse_timestamp(field(&row, columns.created_at)) {
                entry.created_at = created_at;
            }
            workouts[workout_slot].entries.push(entry);
            workouts[workout_slot].entries.len() - 1
        });

        workouts[workout_slot].entries[entry_slot].sets.push(SetRecord::filled(
            parse_count(field(&row, columns.set_index), "set_index"),
            parse_count(field(&row, columns.reps), "reps"),
            parse_weight(field(&row, columns.weight)),
        ));
    }

    Ok(workouts)
}

/// A row cell by optional column position; absent columns and short rows
/// read as empty.
fn field<'a>(row: &'a [String], column: Option<usize>) -> &'a str {
    column
        .and_then(|idx| row.get(idx))
        .map_or("", String::as_str)
}

/// Splits one CSV line with the quote-toggle scanner the artifact format is
/// defined by: a `"` flips the in-quotes flag and is dropped, a `,` splits
/// only outside quotes. A doubled quote inside a quoted field collapses to
/// nothing, so a literal quote cannot be represented; export-produced files
/// are compatible by construction.
#[must_use]
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

fn parse_count(value: &str, column: &str) -> u32 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0;
    }
    match trimmed.parse::<u32>() {
        Ok(count) => count,
        Err(_) => {
            eprintln!("Warning: invalid {column} value '{trimmed}' in CSV import; defaulting to 0.");
            0
        }
    }
}

fn parse_weight(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(weight) => Some(weight),
        Err(_) => {
            eprintln!("Warning: invalid weight value '{trimmed}' in CSV import; leaving it unset.");
            None
        }
    }
}

/// Parses an RFC 3339 timestamp, falling back to a bare `YYYY-MM-DD` date
/// taken as noon UTC. Empty or unrecognized input yields `None`.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
