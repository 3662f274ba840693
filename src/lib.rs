use anyhow::{bail, Context, Result};
// Use anyhow::Result as standard Result for service layer
use chrono::{NaiveDate, TimeZone, Utc};
use std::path::{Path, PathBuf};

// --- Declare modules ---
pub mod codec;
mod config;
pub mod model;
pub mod store;
pub mod taxonomy;

// --- Expose public types ---
pub use config::{
    get_config_path as get_config_path_util,
    load_config as load_config_util,
    parse_color,
    save_config as save_config_util,
    Config,
    ConfigError,
    StandardColor,
    ThemeConfig,
    Units,
};

pub use codec::{CodecError, CSV_COLUMNS, CSV_EXPORT_FILE_NAME, JSON_EXPORT_FILE_NAME};
pub use model::{Document, Entry, Meta, SetRecord, Workout, SET_SLOTS};
pub use store::{
    get_store_path as get_store_path_util,
    LoadOutcome,
    Store,
    StoreError,
};

/// Presentation seam. Invoked with the freshly persisted document after
/// every successful mutation, and on demand after a load.
pub trait Renderer {
    fn render(&mut self, document: &Document);
}

/// Renderer that does nothing. Useful for headless embedding and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _document: &Document) {}
}

#[derive(Default, Clone)]
pub struct AddWorkoutParams<'a> {
    pub workout_name: &'a str,
    pub date: Option<NaiveDate>,
    pub exercise: &'a str,
    pub muscles: &'a [String],
    pub set_count: u32,
    pub reps: u32,
    pub weight: Option<f64>,
    pub notes: &'a str,
}

/// One scalar edit applied to a row of the sheet view.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    /// Sets the row's own date (noon UTC on the given day).
    Date(NaiveDate),
    Exercise(String),
    Reps { slot: usize, reps: u32 },
    Weight { slot: usize, weight: Option<f64> },
}

pub struct AppService {
    pub config: Config,
    pub config_path: PathBuf,
    pub store: Store,
    pub renderer: Box<dyn Renderer>,
}

impl AppService {
    /// Initializes the application service.
    /// # Errors
    /// Returns `anyhow::Error` if config/store path determination or config
    /// loading fails.
    pub fn initialize(renderer: Box<dyn Renderer>) -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load_config(&config_path)
            .context(format!("Failed to load config from {config_path:?}"))?;

        let store = Store::open_default().context("Failed to determine store slot path")?;

        Ok(Self {
            config,
            config_path,
            store,
            renderer,
        })
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_store_path(&self) -> &Path {
        self.store.path()
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save_config(&self.config_path, &self.config)
    }

    /// The current document, re-read from the store.
    #[must_use]
    pub fn document(&self) -> Document {
        self.store.load()
    }

    /// Re-reads the store and hands the document to the renderer.
    pub fn render_current(&mut self) {
        let document = self.store.load();
        self.renderer.render(&document);
    }

    // Every mutation below follows the same cycle: re-read the slot, apply
    // the change in memory, persist, then render. Validation failures abort
    // before anything is written.
    fn commit(&mut self, document: &Document) -> Result<()> {
        self.store
            .save(document)
            .context("Failed to persist workout log")?;
        self.renderer.render(document);
        Ok(())
    }

    /// Adds a quick-add workout: one entry with `set_count` identical sets.
    /// The workout is prepended to the log. Returns the new workout's id.
    /// # Errors
    /// Returns `anyhow::Error` if the exercise name is empty or a muscle tag
    /// is not a recognized group; nothing is persisted on error.
    pub fn add_workout(&mut self, params: AddWorkoutParams) -> Result<String> {
        let exercise = params.exercise.trim();
        if exercise.is_empty() {
            bail!("Exercise name cannot be empty.");
        }
        let mut muscles = Vec::with_capacity(params.muscles.len());
        for muscle in params.muscles {
            let canonical =
                taxonomy::canonical_group(muscle).ok_or_else(|| unknown_group_error(muscle))?;
            muscles.push(canonical.to_string());
        }

        let workout_name = if params.workout_name.trim().is_empty() {
            self.config.default_workout_name.clone()
        } else {
            params.workout_name.trim().to_string()
        };
        let date = match params.date {
            Some(date) => create_timestamp_from_date(date)?,
            None => Utc::now(),
        };

        // The quick-add form carries one reps/weight pair shared by every
        // set; individual sets are edited afterwards.
        let mut entry = Entry::new(exercise, muscles, params.notes.trim());
        let set_count = params.set_count.max(1);
        entry.sets = (1..=set_count)
            .map(|index| SetRecord::filled(index, params.reps, params.weight))
            .collect();

        let mut workout = Workout::new(workout_name, date, "");
        let id = workout.id.clone();
        workout.entries.push(entry);

        let mut document = self.store.load();
        document.workouts.insert(0, workout);
        self.commit(&document)?;
        Ok(id)
    }

    /// Appends a new sheet section for a muscle group (the first group when
    /// none is given), pre-populated with one row. Returns the section
    /// workout's id.
    /// # Errors
    /// Returns `anyhow::Error` for an unrecognized group name.
    pub fn add_group(&mut self, group: Option<&str>) -> Result<String> {
        let group = match group {
            Some(name) => {
                taxonomy::canonical_group(name).ok_or_else(|| unknown_group_error(name))?
            }
            None => taxonomy::default_group(),
        };
        let exercise = first_exercise_of(group)?;

        let now = Utc::now();
        let mut workout = Workout::new(group, now, "");
        let id = workout.id.clone();
        workout.entries.push(Entry::sheet_row(exercise, group, now));

        let mut document = self.store.load();
        document.workouts.push(workout);
        self.commit(&document)?;
        Ok(id)
    }

    /// Appends a row to an existing section: today's date, the section
    /// group's first exercise, unfilled set slots. Returns the entry id.
    /// # Errors
    /// Returns `anyhow::Error` if the section index is out of range.
    pub fn add_row(&mut self, group_index: usize) -> Result<String> {
        let mut document = self.store.load();
        let id;
        {
            let workout = section_mut(&mut document, group_index)?;
            let group = section_group(workout);
            let exercise = first_exercise_of(group)?;
            let entry = Entry::sheet_row(exercise, group, Utc::now());
            id = entry.id.clone();
            workout.entries.push(entry);
        }
        self.commit(&document)?;
        Ok(id)
    }

    /// Reassigns a section to another muscle group. Entries whose exercise
    /// the new group does not list are reset to its first exercise (silent
    /// auto-correction). Returns the number of entries reset; applying the
    /// same group again resets nothing further.
    /// # Errors
    /// Returns `anyhow::Error` for an unrecognized group or bad index.
    pub fn change_group_taxonomy(&mut self, group_index: usize, new_group: &str) -> Result<usize> {
        let group =
            taxonomy::canonical_group(new_group).ok_or_else(|| unknown_group_error(new_group))?;
        let fallback = first_exercise_of(group)?;

        let mut document = self.store.load();
        let reset_count;
        {
            let workout = section_mut(&mut document, group_index)?;
            workout.name = group.to_string();
            let mut resets = 0;
            for entry in &mut workout.entries {
                entry.muscles = vec![group.to_string()];
                if !taxonomy::group_lists(group, &entry.name) {
                    entry.name = fallback.to_string();
                    resets += 1;
                }
            }
            reset_count = resets;
        }
        self.commit(&document)?;
        Ok(reset_count)
    }

    /// In-place update of one scalar field of a row. Persists immediately.
    /// Editing a set slot past the end of the list grows it with unfilled
    /// slots first.
    /// # Errors
    /// Returns `anyhow::Error` for an empty exercise name or bad indices.
    pub fn edit_field(&mut self, group_index: usize, row_index: usize, edit: FieldEdit) -> Result<()> {
        if let FieldEdit::Exercise(name) = &edit {
            if name.trim().is_empty() {
                bail!("Exercise name cannot be empty.");
            }
        }
        let mut document = self.store.load();
        {
            let workout = section_mut(&mut document, group_index)?;
            let entry = row_mut(workout, group_index, row_index)?;
            match edit {
                FieldEdit::Date(date) => entry.date = Some(create_timestamp_from_date(date)?),
                FieldEdit::Exercise(name) => entry.name = name.trim().to_string(),
                FieldEdit::Reps { slot, reps } => ensure_slot(entry, slot).reps = reps,
                FieldEdit::Weight { slot, weight } => ensure_slot(entry, slot).weight = weight,
            }
        }
        self.commit(&document)
    }

    /// Removes one row by position. Rows after it shift down immediately;
    /// indices held from an earlier render must be re-derived.
    /// # Errors
    /// Returns `anyhow::Error` if either index is out of range.
    pub fn delete_row(&mut self, group_index: usize, row_index: usize) -> Result<()> {
        let mut document = self.store.load();
        {
            let workout = section_mut(&mut document, group_index)?;
            row_mut(workout, group_index, row_index)?;
            workout.entries.remove(row_index);
        }
        self.commit(&document)
    }

    /// Removes a whole section by position. Immediate and permanent.
    /// # Errors
    /// Returns `anyhow::Error` if the index is out of range.
    pub fn delete_group(&mut self, group_index: usize) -> Result<()> {
        let mut document = self.store.load();
        section_mut(&mut document, group_index)?;
        document.workouts.remove(group_index);
        self.commit(&document)
    }

    /// Prepends the demonstration workout. Each call adds another copy.
    pub fn seed_sample(&mut self) -> Result<String> {
        let date = Utc.with_ymd_and_hms(2025, 11, 9, 10, 30, 0).unwrap();
        let mut workout = Workout::new("Chest Day", date, "Focus on pressing strength");
        let mut entry = Entry::new(
            "Chestpress",
            vec!["Chest".to_string()],
            "Warm-up then working sets",
        );
        entry.sets = vec![
            SetRecord::filled(1, 10, Some(60.0)),
            SetRecord::filled(2, 10, Some(70.0)),
            SetRecord::filled(3, 10, Some(70.0)),
            SetRecord::filled(4, 10, Some(70.0)),
        ];
        workout.entries.push(entry);
        let id = workout.id.clone();

        let mut document = self.store.load();
        document.workouts.insert(0, workout);
        self.commit(&document)?;
        Ok(id)
    }

    /// Merges an exported JSON artifact: imported workouts are prepended in
    /// artifact order. There is no dedup by id or content; re-importing the
    /// same artifact doubles its workouts. Returns the imported count.
    /// # Errors
    /// Returns `anyhow::Error` (wrapping `CodecError`) with nothing merged
    /// if the artifact is rejected.
    pub fn import_json(&mut self, text: &str) -> Result<usize> {
        let mut imported = codec::workouts_from_json(text)?;
        let count = imported.len();
        let mut document = self.store.load();
        imported.extend(document.workouts.drain(..));
        document.workouts = imported;
        self.commit(&document)?;
        Ok(count)
    }

    /// Rebuilds workouts from a flattened CSV artifact and appends them,
    /// each with fresh ids. Returns the reconstructed workout count.
    /// # Errors
    /// Returns `anyhow::Error` (wrapping `CodecError`) with nothing merged
    /// if the artifact is rejected. Bad numeric cells are defaulted with a
    /// warning, never fatal.
    pub fn import_csv(&mut self, text: &str) -> Result<usize> {
        let imported = codec::workouts_from_csv(text)?;
        let count = imported.len();
        let mut document = self.store.load();
        document.workouts.extend(imported);
        self.commit(&document)?;
        Ok(count)
    }

    /// Dispatches an import by file name: `.json` goes through the JSON
    /// codec, everything else is treated as CSV.
    pub fn import_data(&mut self, file_name: &str, contents: &str) -> Result<usize> {
        if file_name.to_lowercase().ends_with(".json") {
            self.import_json(contents)
        } else {
            self.import_csv(contents)
        }
    }

    /// The pretty-printed JSON export artifact of the current document.
    pub fn export_json(&self) -> Result<String> {
        codec::to_json(&self.store.load()).context("Failed to serialize workout log to JSON")
    }

    /// The flattened CSV export artifact of the current document.
    pub fn export_csv(&self) -> Result<String> {
        codec::to_csv(&self.store.load()).context("Failed to flatten workout log to CSV")
    }

    /// Irreversibly removes the store slot. Without confirmation this is a
    /// no-op returning `false`; there is no bypass.
    pub fn clear_data(&mut self, confirmed: bool) -> Result<bool> {
        if !confirmed {
            return Ok(false);
        }
        self.store.clear().context("Failed to clear the store slot")?;
        self.render_current();
        Ok(true)
    }
}

// --- Helper Functions ---

fn unknown_group_error(name: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Unknown muscle group '{}'. Known groups: {}.",
        name.trim(),
        taxonomy::group_names().join(", ")
    )
}

fn first_exercise_of(group: &str) -> Result<&'static str> {
    taxonomy::first_exercise(group)
        .ok_or_else(|| anyhow::anyhow!("Muscle group '{group}' lists no exercises."))
}

fn section_mut(document: &mut Document, group_index: usize) -> Result<&mut Workout> {
    let count = document.workouts.len();
    document
        .workouts
        .get_mut(group_index)
        .ok_or_else(|| anyhow::anyhow!("No section at index {group_index} (the log has {count})."))
}

fn row_mut<'a>(
    workout: &'a mut Workout,
    group_index: usize,
    row_index: usize,
) -> Result<&'a mut Entry> {
    let rows = workout.entries.len();
    workout.entries.get_mut(row_index).ok_or_else(|| {
        anyhow::anyhow!("No row at index {row_index} in section {group_index} (it has {rows}).")
    })
}

/// The taxonomy key a section answers to: the workout's name when it names
/// a group, else the first recognized muscle tag, else the default group.
fn section_group(workout: &Workout) -> &'static str {
    taxonomy::canonical_group(&workout.name)
        .or_else(|| {
            workout
                .entries
                .iter()
                .flat_map(|entry| entry.muscles.iter())
                .find_map(|muscle| taxonomy::canonical_group(muscle))
        })
        .unwrap_or_else(taxonomy::default_group)
}

/// Grows an entry's set list with unfilled slots until `slot` exists.
fn ensure_slot(entry: &mut Entry, slot: usize) -> &mut SetRecord {
    while entry.sets.len() <= slot {
        let next_index = entry.sets.len() as u32 + 1;
        entry.sets.push(SetRecord::unfilled(next_index));
    }
    &mut entry.sets[slot]
}

/// Creates a UTC timestamp representing noon on the given date.
/// # Errors
/// Returns `anyhow::Error` if date components invalid.
fn create_timestamp_from_date(date: NaiveDate) -> Result<chrono::DateTime<Utc>> {
    let naive_dt = date
        .and_hms_opt(12, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("Invalid date components: {date}"))?;
    Ok(Utc.from_utc_datetime(&naive_dt))
}
