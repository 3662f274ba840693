//src/main.rs
mod cli; // Keep cli module for parsing args

use anyhow::{bail, Context, Result};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;

use fitness_log_lib::{
    parse_color, AddWorkoutParams, AppService, Document, FieldEdit, NullRenderer, Renderer,
    Units, CSV_EXPORT_FILE_NAME, JSON_EXPORT_FILE_NAME,
};

fn main() -> Result<()> {
    let cli_args = cli::parse_args();

    // Initialize the application service (loads config, opens the store slot)
    let mut service = AppService::initialize(Box::new(NullRenderer))
        .context("Failed to initialize application service")?;
    service.renderer = Box::new(TableRenderer::from_config(&service));

    // --- Execute Commands using AppService ---
    match cli_args.command {
        cli::Commands::List => {
            service.render_current();
        }

        cli::Commands::Add {
            exercise,
            workout_name,
            date,
            muscles,
            sets,
            reps,
            weight,
            notes,
        } => {
            let muscle_list: Vec<String> = muscles
                .as_deref()
                .unwrap_or("")
                .split(',')
                .map(str::trim)
                .filter(|muscle| !muscle.is_empty())
                .map(str::to_string)
                .collect();
            let set_count = sets.unwrap_or(service.config.quick_add_sets).max(1);
            let weight_suffix = service.config.units.weight_suffix();

            let params = AddWorkoutParams {
                workout_name: workout_name.as_deref().unwrap_or(""),
                date,
                exercise: &exercise,
                muscles: &muscle_list,
                set_count,
                reps,
                weight,
                notes: notes.as_deref().unwrap_or(""),
            };
            match service.add_workout(params) {
                Ok(id) => println!(
                    "Successfully logged '{}': {} set(s) of {} reps{}. Workout ID: {}",
                    exercise.trim(),
                    set_count,
                    reps,
                    weight.map_or(String::new(), |w| format!(" @ {w} {weight_suffix}")),
                    id
                ),
                Err(e) => bail!("Error adding workout: {}", e),
            }
        }

        cli::Commands::AddGroup { group } => {
            match service.add_group(group.as_deref()) {
                Ok(id) => println!("Successfully added muscle-group section (ID: {id})."),
                Err(e) => bail!("Error adding section: {}", e),
            }
        }

        cli::Commands::AddRow { group } => {
            match service.add_row(group) {
                Ok(id) => println!("Added a row to section {group} (ID: {id})."),
                Err(e) => bail!("Error adding row: {}", e),
            }
        }

        cli::Commands::SetGroup { group, name } => {
            match service.change_group_taxonomy(group, &name) {
                Ok(resets) => {
                    println!(
                        "Reassigned section {group} to '{}' ({resets} row(s) reset to the group's first exercise).",
                        name.trim()
                    );
                }
                Err(e) => bail!("Error reassigning section {}: {}", group, e),
            }
        }

        cli::Commands::Edit {
            group,
            row,
            date,
            exercise,
            set,
            reps,
            weight,
            clear_weight,
        } => {
            let mut edits: Vec<FieldEdit> = Vec::new();
            if let Some(new_date) = date {
                edits.push(FieldEdit::Date(new_date));
            }
            if let Some(new_exercise) = exercise {
                edits.push(FieldEdit::Exercise(new_exercise));
            }
            if let Some(slot) = set {
                if slot == 0 {
                    bail!("Set slots are numbered from 1.");
                }
                let slot = slot - 1;
                if let Some(new_reps) = reps {
                    edits.push(FieldEdit::Reps { slot, reps: new_reps });
                }
                if clear_weight {
                    edits.push(FieldEdit::Weight { slot, weight: None });
                } else if let Some(new_weight) = weight {
                    edits.push(FieldEdit::Weight {
                        slot,
                        weight: Some(new_weight),
                    });
                }
            }
            if edits.is_empty() {
                bail!("No fields provided to update for section {} row {}", group, row);
            }
            let count = edits.len();
            for edit in edits {
                if let Err(e) = service.edit_field(group, row, edit) {
                    bail!("Error editing section {} row {}: {}", group, row, e);
                }
            }
            println!("Successfully updated {count} field(s) of section {group} row {row}.");
        }

        cli::Commands::DeleteRow { group, row } => {
            match service.delete_row(group, row) {
                Ok(()) => println!(
                    "Successfully deleted row {row} from section {group}. Later rows have shifted down."
                ),
                Err(e) => bail!("Error deleting row: {}", e),
            }
        }

        cli::Commands::DeleteGroup { group } => {
            match service.delete_group(group) {
                Ok(()) => println!("Successfully deleted section {group}."),
                Err(e) => bail!("Error deleting section: {}", e),
            }
        }

        cli::Commands::Seed => {
            match service.seed_sample() {
                Ok(id) => println!("Sample workout seeded (ID: {id})."),
                Err(e) => bail!("Error seeding sample workout: {}", e),
            }
        }

        cli::Commands::Import { file } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read import file {file:?}"))?;
            let file_name = file
                .file_name()
                .map_or_else(String::new, |name| name.to_string_lossy().into_owned());
            match service.import_data(&file_name, &contents) {
                Ok(count) => println!("Imported {count} workout(s) from {file:?}."),
                Err(e) => bail!("Import failed: {}", e),
            }
        }

        cli::Commands::ExportJson { output } => {
            let text = service.export_json()?;
            let path = output.unwrap_or_else(|| PathBuf::from(JSON_EXPORT_FILE_NAME));
            std::fs::write(&path, text)
                .with_context(|| format!("Failed to write export file {path:?}"))?;
            println!("Exported workout log to {path:?}.");
        }

        cli::Commands::ExportCsv { output } => {
            let text = service.export_csv()?;
            let path = output.unwrap_or_else(|| PathBuf::from(CSV_EXPORT_FILE_NAME));
            std::fs::write(&path, text)
                .with_context(|| format!("Failed to write export file {path:?}"))?;
            println!("Exported workout log to {path:?}.");
        }

        cli::Commands::Clear => {
            let confirmed = prompt_confirm_clear()?;
            if service.clear_data(confirmed)? {
                println!("Local data cleared.");
            } else {
                println!("Clear cancelled; local data untouched.");
            }
        }

        cli::Commands::StorePath => {
            println!("{:?}", service.get_store_path());
        }
    }

    Ok(())
}

/// Asks on stdin before destroying the slot. There is deliberately no flag
/// that skips this.
fn prompt_confirm_clear() -> Result<bool> {
    print!("Clear local data? This cannot be undone. [y/N]: ");
    stdout().flush()?;
    let mut input = String::new();
    stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Prints the log as one table per workout, sheet style: a header line with
/// the section index, then rows of date/exercise/muscles/sets/notes.
struct TableRenderer {
    header_color: Color,
    units: Units,
}

impl TableRenderer {
    fn from_config(service: &AppService) -> Self {
        let header_color = parse_color(&service.config.theme.header_color)
            .map(Color::from)
            .unwrap_or(Color::Green);
        Self {
            header_color,
            units: service.config.units,
        }
    }

    fn header_cell(&self, text: &str) -> Cell {
        Cell::new(text)
            .fg(self.header_color)
            .add_attribute(Attribute::Bold)
    }
}

impl Renderer for TableRenderer {
    fn render(&mut self, document: &Document) {
        if document.workouts.is_empty() {
            println!("No workouts yet. Use `add` or `add-group` to log one.");
            return;
        }
        for (group_index, workout) in document.workouts.iter().enumerate() {
            println!(
                "[{group_index}] {} ({})",
                workout.name,
                workout.date.format("%Y-%m-%d")
            );
            if !workout.notes.is_empty() {
                println!("    {}", workout.notes);
            }

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    self.header_cell("Row"),
                    self.header_cell("Date"),
                    self.header_cell("Exercise"),
                    self.header_cell("Muscles"),
                    self.header_cell(&format!("Sets (reps@{})", self.units.weight_suffix())),
                    self.header_cell("Notes"),
                ]);

            for (row_index, entry) in workout.entries.iter().enumerate() {
                let sets = entry
                    .sets
                    .iter()
                    .map(|set| match set.weight {
                        Some(weight) => format!("{}:{}@{}", set.set_index, set.reps, weight),
                        None => format!("{}:{}", set.set_index, set.reps),
                    })
                    .collect::<Vec<_>>()
                    .join("  ");
                table.add_row(vec![
                    row_index.to_string(),
                    entry
                        .effective_date(workout.date)
                        .format("%Y-%m-%d")
                        .to_string(),
                    entry.name.clone(),
                    entry.muscles.join(", "),
                    sets,
                    entry.notes.clone(),
                ]);
            }
            println!("{table}");
        }
    }
}
