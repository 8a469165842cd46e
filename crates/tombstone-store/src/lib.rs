//! Tombstone Storage Layer
//!
//! Implements the RecordStore trait on top of a single JSON file.
//!
//! # Format
//!
//! The file is a JSON object keyed by item id. Each value is the triple
//! `[release_score, deadline, item_ref]`, with the deadline in fractional epoch
//! seconds:
//!
//! ```json
//! {"1234567": [-12, 1700172800.0, "level-974"]}
//! ```
//!
//! The whole file is rewritten on every flush. Writes go to a temporary file
//! in the same directory which is then renamed over the target, so a crash
//! mid-write leaves the previous contents intact.
//!
//! # Examples
//!
//! ```no_run
//! use tombstone_store::JsonFileStore;
//!
//! let store = JsonFileStore::open("deleted_pages.json").unwrap();
//! // Store is now ready for record operations
//! ```

#![warn(missing_docs)]

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tombstone_domain::traits::{RecordStore, StoreSnapshot};
use tombstone_domain::{DeletionRecord, ItemId, Timestamp};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Store file is not valid JSON of the expected shape
    #[error("Malformed store file: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Decoded data violates a record invariant
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// On-disk shape of a single record
type RecordTuple = (i64, f64, String);

/// File-backed implementation of RecordStore
///
/// All reads and writes hit the in-memory map; only [`RecordStore::flush`]
/// touches the disk. A store without a path never persists, which is what the
/// tests and dry runs use.
#[derive(Debug, Default)]
pub struct JsonFileStore {
    path: Option<PathBuf>,
    records: BTreeMap<ItemId, DeletionRecord>,
}

impl JsonFileStore {
    /// Open the store at `path`
    ///
    /// A missing file is an empty store; it is created on the first flush.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            Self::decode(&contents)?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: Some(path),
            records,
        })
    }

    /// Store that lives only in memory
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize the records into the file format
    pub fn encode(&self) -> Result<String, StoreError> {
        let raw: BTreeMap<&str, RecordTuple> = self
            .records
            .iter()
            .map(|(id, record)| {
                (
                    id.as_str(),
                    (
                        record.release_score,
                        record.deadline.as_secs_f64(),
                        record.item_ref.clone(),
                    ),
                )
            })
            .collect();
        Ok(serde_json::to_string(&raw)?)
    }

    /// Parse the file format
    pub fn decode(contents: &str) -> Result<BTreeMap<ItemId, DeletionRecord>, StoreError> {
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let raw: BTreeMap<String, RecordTuple> = serde_json::from_str(contents)?;
        let mut records = BTreeMap::new();
        for (id, (release_score, deadline, item_ref)) in raw {
            if !deadline.is_finite() {
                return Err(StoreError::InvalidData(format!(
                    "Non-finite deadline for item {}",
                    id
                )));
            }
            records.insert(
                ItemId::new(id),
                DeletionRecord::new(release_score, Timestamp::from_secs_f64(deadline), item_ref),
            );
        }
        Ok(records)
    }

    fn write_atomically(path: &Path, contents: &str) -> Result<(), StoreError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    type Error = StoreError;

    fn get(&self, id: &ItemId) -> Option<DeletionRecord> {
        self.records.get(id).cloned()
    }

    fn put(&mut self, id: ItemId, record: DeletionRecord) {
        self.records.insert(id, record);
    }

    fn delete(&mut self, id: &ItemId) -> Option<DeletionRecord> {
        self.records.remove(id)
    }

    fn ids(&self) -> Vec<ItemId> {
        self.records.keys().cloned().collect()
    }

    fn snapshot(&self) -> StoreSnapshot {
        self.records.clone()
    }

    fn restore(&mut self, snapshot: StoreSnapshot) {
        self.records = snapshot;
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let contents = self.encode()?;
        Self::write_atomically(path, &contents)
    }
}
