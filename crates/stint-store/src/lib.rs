//! JSON file persistence for the stint tracker.
//!
//! Three documents live under one data directory: the stint log
//! (`log.json`, an array of records), the settings (`settings.json`) and
//! the treat bank (`treats.json`). Every operation loads or writes a whole
//! file; there is no locking, so two concurrent processes can overwrite
//! each other's changes. That is an accepted limitation of the single-user
//! design.
//!
//! Missing files are seeded with their defaults when the store is opened.
//! A file that exists but does not parse is a fatal [`StoreError::Corrupt`];
//! there is no safe recovery from structurally invalid state.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use stint_core::{Settings, StintRecord, TreatBankEntry};

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a data file failed.
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data file exists but is not valid JSON of the expected shape.
    #[error("corrupt data in {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Settings parsed but contain an unparseable duration string.
    #[error("invalid settings in {path}: {source}")]
    InvalidSettings {
        path: PathBuf,
        #[source]
        source: stint_core::FormatError,
    },
}

/// File-backed store for the log, settings and treat bank.
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Opens a store rooted at `dir`, creating the directory and seeding
    /// any missing file with its default content.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let store = Self {
            dir: dir.to_path_buf(),
        };

        store.seed_missing(&store.log_path(), &Vec::<StintRecord>::new())?;
        store.seed_missing(&store.settings_path(), &Settings::default())?;
        store.seed_missing(&store.bank_path(), &Vec::<TreatBankEntry>::new())?;

        Ok(store)
    }

    /// Path of the stint log file.
    pub fn log_path(&self) -> PathBuf {
        self.dir.join("log.json")
    }

    /// Path of the settings file.
    pub fn settings_path(&self) -> PathBuf {
        self.dir.join("settings.json")
    }

    /// Path of the treat bank file.
    pub fn bank_path(&self) -> PathBuf {
        self.dir.join("treats.json")
    }

    /// Loads the whole stint log.
    pub fn load_log(&self) -> Result<Vec<StintRecord>, StoreError> {
        read_json(&self.log_path())
    }

    /// Appends one record and returns the updated log.
    pub fn append_record(&self, record: StintRecord) -> Result<Vec<StintRecord>, StoreError> {
        let mut records = self.load_log()?;
        records.push(record);
        self.save_log(&records)?;
        tracing::debug!(count = records.len(), "stint appended to log");
        Ok(records)
    }

    /// Overwrites the stint log.
    pub fn save_log(&self, records: &[StintRecord]) -> Result<(), StoreError> {
        write_json(&self.log_path(), &records)
    }

    /// Loads the settings, rejecting any unparseable embedded duration
    /// string at this boundary.
    pub fn load_settings(&self) -> Result<Settings, StoreError> {
        let path = self.settings_path();
        let settings: Settings = read_json(&path)?;
        settings
            .validate()
            .map_err(|source| StoreError::InvalidSettings { path, source })?;
        Ok(settings)
    }

    /// Overwrites the settings.
    pub fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        write_json(&self.settings_path(), settings)
    }

    /// Loads the treat bank.
    pub fn load_bank(&self) -> Result<Vec<TreatBankEntry>, StoreError> {
        read_json(&self.bank_path())
    }

    /// Overwrites the treat bank.
    pub fn save_bank(&self, bank: &[TreatBankEntry]) -> Result<(), StoreError> {
        write_json(&self.bank_path(), &bank)
    }

    /// Persists the rule set and bank from one reward evaluation pass
    /// together, so callers have a single update point after evaluating
    /// all rules against a snapshot.
    pub fn save_settings_and_bank(
        &self,
        settings: &Settings,
        bank: &[TreatBankEntry],
    ) -> Result<(), StoreError> {
        self.save_settings(settings)?;
        self.save_bank(bank)
    }

    fn seed_missing<T: Serialize>(&self, path: &Path, default: &T) -> Result<(), StoreError> {
        if !path.exists() {
            write_json(path, default)?;
            tracing::debug!(path = %path.display(), "seeded missing data file");
        }
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let contents = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let contents = serde_json::to_string_pretty(value).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, contents).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
