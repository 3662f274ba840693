// src/model.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Version stamped into `Meta` for documents created by this build.
pub const SCHEMA_VERSION: u32 = 1;

/// Number of set slots a sheet row is created with.
pub const SET_SLOTS: usize = 4;

fn token(prefix: &str) -> String {
    format!("{prefix}{}", Uuid::new_v4().simple())
}

/// Fresh opaque workout id (`w_` prefix).
pub fn workout_id() -> String {
    token("w_")
}

/// Fresh opaque entry id (`e_` prefix).
pub fn entry_id() -> String {
    token("e_")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default = "schema_version")]
    pub version: u32,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn schema_version() -> u32 {
    SCHEMA_VERSION
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            created_at: Utc::now(),
        }
    }
}

/// The whole persisted state. One per store slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub workouts: Vec<Workout>,
}

impl Document {
    /// An empty document stamped with the current schema version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            meta: Meta::default(),
            workouts: Vec::new(),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// A dated session grouping one or more entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    #[serde(default = "workout_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Workout {
    pub fn new(name: impl Into<String>, date: DateTime<Utc>, notes: impl Into<String>) -> Self {
        Self {
            id: workout_id(),
            name: name.into(),
            date,
            notes: notes.into(),
            created_at: Utc::now(),
            entries: Vec::new(),
        }
    }
}

/// One exercise performed, with an ordered list of sets.
///
/// `date` is only present on entries edited through the sheet view; `None`
/// means the entry shares its parent workout's date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default = "entry_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub muscles: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sets: Vec<SetRecord>,
}

impl Entry {
    pub fn new(
        name: impl Into<String>,
        muscles: Vec<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id: entry_id(),
            name: name.into(),
            muscles,
            notes: notes.into(),
            created_at: Utc::now(),
            date: None,
            sets: Vec::new(),
        }
    }

    /// A sheet row: own date, single muscle tag, `SET_SLOTS` unfilled sets.
    pub fn sheet_row(exercise: impl Into<String>, group: &str, date: DateTime<Utc>) -> Self {
        let mut entry = Self::new(exercise, vec![group.to_string()], "");
        entry.date = Some(date);
        entry.sets = (1..=SET_SLOTS as u32).map(SetRecord::unfilled).collect();
        entry
    }

    /// The date a row reports: its own if set, else the parent workout's.
    #[must_use]
    pub fn effective_date(&self, workout_date: DateTime<Utc>) -> DateTime<Utc> {
        self.date.unwrap_or(workout_date)
    }
}

/// One performed unit: rep count plus optional weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SetRecord {
    #[serde(default)]
    pub set_index: u32,
    #[serde(default)]
    pub reps: u32,
    #[serde(default)]
    pub weight: Option<f64>,
}

impl SetRecord {
    /// A slot not yet filled in by the user.
    #[must_use]
    pub const fn unfilled(set_index: u32) -> Self {
        Self {
            set_index,
            reps: 0,
            weight: None,
        }
    }

    #[must_use]
    pub const fn filled(set_index: u32, reps: u32, weight: Option<f64>) -> Self {
        Self {
            set_index,
            reps,
            weight,
        }
    }

    #[must_use]
    pub const fn is_unfilled(&self) -> bool {
        self.reps == 0 && self.weight.is_none()
    }
}
