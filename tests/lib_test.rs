use anyhow::Result;
use chrono::NaiveDate;
use fitness_log_lib::{
    AddWorkoutParams, AppService, Config, Document, FieldEdit, LoadOutcome, NullRenderer,
    Renderer, SetRecord, Store,
};
use std::cell::Cell;
use std::rc::Rc;

// Helper function to create a test service backed by a throwaway store slot
fn create_test_service() -> Result<(AppService, tempfile::TempDir)> {
    let dir = tempfile::tempdir()?;
    let service = AppService {
        config: Config::default(),
        config_path: dir.path().join("config.toml"),
        store: Store::new(dir.path().join("fitness_data_v1.json")),
        renderer: Box::new(NullRenderer),
    };
    Ok((service, dir))
}

fn quick_add(
    service: &mut AppService,
    exercise: &str,
    set_count: u32,
    reps: u32,
    weight: Option<f64>,
) -> Result<String> {
    let muscles = vec!["Chest".to_string()];
    service.add_workout(AddWorkoutParams {
        workout_name: "Push Day",
        date: NaiveDate::from_ymd_opt(2025, 6, 2),
        exercise,
        muscles: &muscles,
        set_count,
        reps,
        weight,
        notes: "tempo 3-1-1, pause reps",
    })
}

// Flattened view used to compare documents across a CSV round trip: ids are
// regenerated by the import, so only the row-level values are compared.
fn flatten(document: &Document) -> Vec<(String, String, String, u32, u32, String)> {
    let mut rows = Vec::new();
    for workout in &document.workouts {
        for entry in &workout.entries {
            for set in &entry.sets {
                rows.push((
                    entry.effective_date(workout.date).to_rfc3339(),
                    workout.name.clone(),
                    entry.name.clone(),
                    set.set_index,
                    set.reps,
                    set.weight.map_or(String::new(), |w| w.to_string()),
                ));
            }
        }
    }
    rows.sort();
    rows
}

#[test]
fn test_json_export_round_trips_document() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;
    service.seed_sample()?;
    quick_add(&mut service, "Incline Bench Press", 3, 8, Some(50.0))?;

    let document = service.document();
    let exported = service.export_json()?;
    let parsed: Document = serde_json::from_str(&exported)?;
    assert_eq!(parsed, document);

    Ok(())
}

#[test]
fn test_csv_round_trip_preserves_flattened_rows() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;
    service.seed_sample()?;
    quick_add(&mut service, "Cable Crossover", 2, 12, None)?;
    let original = service.document();

    let exported = service.export_csv()?;

    let (mut other, _dir2) = create_test_service()?;
    other.import_csv(&exported)?;
    let imported = other.document();

    assert_eq!(flatten(&imported), flatten(&original));

    // Muscles and notes survive per entry, but ids are regenerated.
    let original_entry = &original.workouts[0].entries[0];
    let imported_entry = &imported.workouts[0].entries[0];
    assert_eq!(imported_entry.muscles, original_entry.muscles);
    assert_eq!(imported_entry.notes, original_entry.notes);
    assert_ne!(imported.workouts[0].id, original.workouts[0].id);

    Ok(())
}

#[test]
fn test_json_import_missing_workouts_rejected() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;
    service.seed_sample()?;
    let before = service.document();

    let result = service.import_json("{\"groups\": []}");
    assert!(result.is_err());
    assert_eq!(service.document(), before);

    Ok(())
}

#[test]
fn test_add_workout_empty_exercise_rejected() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;
    service.seed_sample()?;

    let result = quick_add(&mut service, "   ", 3, 10, None);
    assert!(result.is_err());
    assert_eq!(service.document().workouts.len(), 1);

    Ok(())
}

#[test]
fn test_add_workout_unknown_muscle_group_rejected() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;
    let muscles = vec!["Cardio".to_string()];
    let result = service.add_workout(AddWorkoutParams {
        exercise: "Bench Press",
        muscles: &muscles,
        set_count: 1,
        reps: 10,
        ..Default::default()
    });
    assert!(result.is_err());
    assert!(service.document().workouts.is_empty());

    Ok(())
}

#[test]
fn test_muscle_groups_resolve_case_insensitively() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;
    let muscles = vec!["chest".to_string()];
    service.add_workout(AddWorkoutParams {
        exercise: "Push-up",
        muscles: &muscles,
        set_count: 1,
        reps: 20,
        ..Default::default()
    })?;
    service.add_group(Some("legs anterior"))?;

    let document = service.document();
    assert_eq!(document.workouts[0].entries[0].muscles, vec!["Chest".to_string()]);
    assert_eq!(document.workouts[1].name, "Legs Anterior");

    Ok(())
}

#[test]
fn test_add_group_and_row_defaults() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;
    service.add_group(None)?;

    let document = service.document();
    let workout = &document.workouts[0];
    assert_eq!(workout.name, "Chest");
    assert_eq!(workout.entries.len(), 1);
    let entry = &workout.entries[0];
    assert_eq!(entry.name, "Bench Press");
    assert_eq!(entry.muscles, vec!["Chest".to_string()]);
    assert_eq!(entry.sets.len(), 4);
    assert!(entry.sets.iter().all(SetRecord::is_unfilled));

    service.add_row(0)?;
    let document = service.document();
    assert_eq!(document.workouts[0].entries.len(), 2);
    assert_eq!(document.workouts[0].entries[1].name, "Bench Press");

    Ok(())
}

#[test]
fn test_taxonomy_change_resets_unlisted_exercises() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;
    service.add_group(Some("Chest"))?;
    service.add_row(0)?;
    // "Dips" is listed under Chest but not under Back.
    service.edit_field(0, 1, FieldEdit::Exercise("Dips".to_string()))?;

    let resets = service.change_group_taxonomy(0, "Back")?;
    assert_eq!(resets, 2);

    let document = service.document();
    let workout = &document.workouts[0];
    assert_eq!(workout.name, "Back");
    for entry in &workout.entries {
        assert_eq!(entry.name, "Pull-up");
        assert_eq!(entry.muscles, vec!["Back".to_string()]);
    }

    // Applying the same group again changes nothing.
    let resets = service.change_group_taxonomy(0, "Back")?;
    assert_eq!(resets, 0);
    assert_eq!(service.document(), document);

    Ok(())
}

#[test]
fn test_delete_row_shifts_later_rows_down() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;
    service.add_group(Some("Biceps"))?;
    service.add_row(0)?;
    service.add_row(0)?;
    service.edit_field(0, 0, FieldEdit::Exercise("Cable Curl".to_string()))?;
    service.edit_field(0, 1, FieldEdit::Exercise("Chin-up".to_string()))?;
    service.edit_field(0, 2, FieldEdit::Exercise("Preacher Curl".to_string()))?;
    service.edit_field(0, 2, FieldEdit::Reps { slot: 0, reps: 12 })?;

    service.delete_row(0, 1)?;

    let document = service.document();
    let workout = &document.workouts[0];
    assert_eq!(workout.entries.len(), 2);
    assert_eq!(workout.entries[0].name, "Cable Curl");
    assert_eq!(workout.entries[1].name, "Preacher Curl");
    assert_eq!(workout.entries[1].sets[0].reps, 12);

    Ok(())
}

#[test]
fn test_edit_set_slot_grows_list_with_unfilled_slots() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;
    quick_add(&mut service, "Bench Press", 1, 10, Some(60.0))?;

    service.edit_field(0, 0, FieldEdit::Weight { slot: 3, weight: Some(72.5) })?;

    let document = service.document();
    let entry = &document.workouts[0].entries[0];
    assert_eq!(entry.sets.len(), 4);
    assert_eq!(entry.sets[0].weight, Some(60.0));
    assert!(entry.sets[1].is_unfilled());
    assert_eq!(entry.sets[3].set_index, 4);
    assert_eq!(entry.sets[3].weight, Some(72.5));

    Ok(())
}

#[test]
fn test_edit_date_overrides_row_date() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;
    service.add_group(Some("Back"))?;

    service.edit_field(0, 0, FieldEdit::Date(NaiveDate::from_ymd_opt(2025, 7, 4).unwrap()))?;

    let document = service.document();
    let workout = &document.workouts[0];
    let entry = &workout.entries[0];
    assert_eq!(
        entry
            .effective_date(workout.date)
            .format("%Y-%m-%d")
            .to_string(),
        "2025-07-04"
    );

    Ok(())
}

#[test]
fn test_seed_sample_and_csv_export_scenario() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;
    service.seed_sample()?;

    let document = service.document();
    assert_eq!(document.workouts.len(), 1);
    let workout = &document.workouts[0];
    assert_eq!(workout.name, "Chest Day");
    assert_eq!(workout.entries.len(), 1);
    let entry = &workout.entries[0];
    assert_eq!(entry.name, "Chestpress");
    assert_eq!(entry.sets.len(), 4);
    assert!(entry.sets.iter().all(|set| set.reps == 10));
    let weights: Vec<_> = entry.sets.iter().map(|set| set.weight).collect();
    assert_eq!(weights, vec![Some(60.0), Some(70.0), Some(70.0), Some(70.0)]);

    let csv = service.export_csv()?;
    let data_rows: Vec<&str> = csv.lines().skip(1).filter(|line| !line.is_empty()).collect();
    assert_eq!(data_rows.len(), 4);
    assert!(data_rows.iter().all(|row| row.contains("\"Chest Day\"")));

    Ok(())
}

#[test]
fn test_json_import_prepends_and_never_dedups() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;
    service.seed_sample()?;
    let artifact = service.export_json()?;
    service.add_group(Some("Back"))?;

    // Dispatch by extension goes through the JSON codec.
    let count = service.import_data("fitness-data.json", &artifact)?;
    assert_eq!(count, 1);

    let names: Vec<String> = service
        .document()
        .workouts
        .iter()
        .map(|workout| workout.name.clone())
        .collect();
    assert_eq!(names, vec!["Chest Day", "Chest Day", "Back"]);

    // A second import of the same artifact doubles up again.
    service.import_json(&artifact)?;
    assert_eq!(service.document().workouts.len(), 4);

    Ok(())
}

#[test]
fn test_csv_import_appends_with_fresh_ids() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;
    service.seed_sample()?;
    let artifact = service.export_csv()?;

    let count = service.import_csv(&artifact)?;
    assert_eq!(count, 1);

    let document = service.document();
    assert_eq!(document.workouts.len(), 2);
    assert_eq!(document.workouts[1].name, "Chest Day");
    assert_ne!(document.workouts[0].id, document.workouts[1].id);

    Ok(())
}

#[test]
fn test_clear_requires_confirmation() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;
    service.seed_sample()?;
    assert!(service.store.exists());

    assert!(!service.clear_data(false)?);
    assert!(service.store.exists());
    assert_eq!(service.document().workouts.len(), 1);

    assert!(service.clear_data(true)?);
    assert!(!service.store.exists());
    let (document, outcome) = service.store.load_with_outcome();
    assert_eq!(outcome, LoadOutcome::Created);
    assert!(document.workouts.is_empty());

    Ok(())
}

#[derive(Clone, Default)]
struct CountingRenderer {
    calls: Rc<Cell<usize>>,
}

impl Renderer for CountingRenderer {
    fn render(&mut self, _document: &Document) {
        self.calls.set(self.calls.get() + 1);
    }
}

#[test]
fn test_render_fires_after_each_successful_mutation() -> Result<()> {
    let (mut service, _dir) = create_test_service()?;
    let calls = Rc::new(Cell::new(0));
    service.renderer = Box::new(CountingRenderer {
        calls: Rc::clone(&calls),
    });

    service.seed_sample()?;
    assert_eq!(calls.get(), 1);
    service.add_group(None)?;
    assert_eq!(calls.get(), 2);
    service.render_current();
    assert_eq!(calls.get(), 3);

    // A rejected mutation never renders.
    let result = service.add_workout(AddWorkoutParams::default());
    assert!(result.is_err());
    assert_eq!(calls.get(), 3);

    Ok(())
}
