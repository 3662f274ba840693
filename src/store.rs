// src/store.rs
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::Document;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not determine application data directory.")]
    DataDir,
    #[error("I/O error accessing store slot: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize workout document: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// How a `load` produced its document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The slot existed and parsed.
    Loaded,
    /// The slot was absent; a fresh empty document was created in memory.
    Created,
    /// The slot existed but could not be read or parsed; its contents were
    /// abandoned in favor of a fresh empty document. Carries the reason.
    Recovered(String),
}

const SLOT_FILE_NAME: &str = "fitness_data_v1.json";
const APP_DATA_DIR: &str = "fitness-log";

/// Path of the default store slot inside the app's data directory.
/// Creates the directory if it doesn't exist.
pub fn get_store_path() -> Result<PathBuf, StoreError> {
    let data_dir = dirs::data_dir().ok_or(StoreError::DataDir)?;
    let app_dir = data_dir.join(APP_DATA_DIR);
    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir)?;
    }
    Ok(app_dir.join(SLOT_FILE_NAME))
}

/// One named slot holding the JSON text of a single [`Document`].
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Opens the default slot for this user.
    pub fn open_default() -> Result<Self, StoreError> {
        Ok(Self::new(get_store_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads the slot. Never fails: an absent slot yields a fresh empty
    /// document, and an unreadable or unparseable slot is abandoned for a
    /// fresh one with a warning on stderr. Callers that want to surface the
    /// recovery should use [`Store::load_with_outcome`].
    #[must_use]
    pub fn load(&self) -> Document {
        let (document, outcome) = self.load_with_outcome();
        if let LoadOutcome::Recovered(reason) = outcome {
            eprintln!(
                "Warning: store slot {:?} is unreadable ({reason}); starting from an empty log.",
                self.path
            );
        }
        document
    }

    /// Like [`Store::load`], but reports how the document was obtained.
    #[must_use]
    pub fn load_with_outcome(&self) -> (Document, LoadOutcome) {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return (Document::new(), LoadOutcome::Created);
            }
            Err(err) => return (Document::new(), LoadOutcome::Recovered(err.to_string())),
        };
        match serde_json::from_str::<Document>(&text) {
            Ok(document) => (document, LoadOutcome::Loaded),
            Err(err) => (Document::new(), LoadOutcome::Recovered(err.to_string())),
        }
    }

    /// Serializes the whole document and replaces the slot in one write.
    /// Atomicity of the replacement is the filesystem's, not re-implemented.
    pub fn save(&self, document: &Document) -> Result<(), StoreError> {
        let text = serde_json::to_string(document)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }

    /// Irreversibly removes the slot. An already-absent slot is success.
    pub fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
