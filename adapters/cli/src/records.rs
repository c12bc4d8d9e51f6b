//! High-score records persisted between sessions.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coins collected by one player in one session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEntry {
    /// Name the player entered.
    pub user_name: String,
    /// Coins held when the session ended.
    pub collected_coins: u32,
}

impl RecordEntry {
    /// Creates a record entry.
    #[must_use]
    pub fn new(user_name: impl Into<String>, collected_coins: u32) -> Self {
        Self {
            user_name: user_name.into(),
            collected_coins,
        }
    }
}

/// Errors raised by the records store.
#[derive(Debug, Error)]
pub enum RecordsError {
    /// The records file could not be read or written.
    #[error("could not access records file {path}")]
    Io {
        /// Location of the records file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The records file is not a valid records document.
    #[error("records file {path} is malformed")]
    Malformed {
        /// Location of the records file.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Storage for high-score records.
pub trait RecordStore {
    /// Loads every record, most coins first. Ties keep insertion order.
    fn load_records(&self) -> Result<Vec<RecordEntry>, RecordsError>;

    /// Appends a record for `user_name`.
    fn append_record(&mut self, user_name: &str, collected_coins: u32) -> Result<(), RecordsError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RecordsDocument {
    records: Vec<RecordEntry>,
}

/// Records stored as a JSON document on disk.
///
/// A missing file holds no records.
#[derive(Clone, Debug)]
pub struct JsonRecordStore {
    path: PathBuf,
}

impl JsonRecordStore {
    /// Creates a store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<RecordsDocument, RecordsError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(RecordsDocument::default());
            }
            Err(source) => return Err(self.io_error(source)),
        };
        serde_json::from_slice(&bytes).map_err(|source| RecordsError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn io_error(&self, source: io::Error) -> RecordsError {
        RecordsError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl RecordStore for JsonRecordStore {
    fn load_records(&self) -> Result<Vec<RecordEntry>, RecordsError> {
        let mut records = self.read_document()?.records;
        records.sort_by(|left, right| right.collected_coins.cmp(&left.collected_coins));
        Ok(records)
    }

    fn append_record(&mut self, user_name: &str, collected_coins: u32) -> Result<(), RecordsError> {
        let mut document = self.read_document()?;
        document
            .records
            .push(RecordEntry::new(user_name, collected_coins));

        let json = serde_json::to_vec_pretty(&document).map_err(|source| {
            RecordsError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        fs::write(&self.path, json).map_err(|source| self.io_error(source))
    }
}
