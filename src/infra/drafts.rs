//! Draft slot backends.

use std::{
    fs, io,
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::application::ports::{DraftStore, DraftStoreError};
use crate::config::{DEFAULT_DRAFT_SLOT, DraftSettings};
use crate::domain::draft::DraftRecord;
use crate::util::lock::mutex_lock;

const SOURCE: &str = "infra::drafts";

/// One JSON file per slot. Writes go through a temporary file in the same
/// directory and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    directory: PathBuf,
    slot: String,
}

impl FileDraftStore {
    pub fn new(directory: impl Into<PathBuf>, slot: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            slot: slot.into(),
        }
    }

    pub fn from_settings(settings: &DraftSettings) -> Self {
        Self::new(settings.directory.clone(), settings.slot.clone())
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(format!("{}.json", self.slot))
    }
}

impl DraftStore for FileDraftStore {
    fn slot(&self) -> &str {
        &self.slot
    }

    fn save(&self, record: &DraftRecord) -> Result<(), DraftStoreError> {
        fs::create_dir_all(&self.directory)?;
        let mut file = NamedTempFile::new_in(&self.directory)?;
        serde_json::to_writer_pretty(&mut file, record)?;
        file.write_all(b"\n")?;
        file.persist(self.path()).map_err(|err| err.error)?;
        debug!(target = SOURCE, slot = %self.slot, "draft written");
        Ok(())
    }

    fn restore(&self) -> Result<Option<DraftRecord>, DraftStoreError> {
        match read_if_exists(&self.path())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn clear(&self) -> Result<(), DraftStoreError> {
        match fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>, io::Error> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Slot kept in process memory as serialized JSON.
#[derive(Debug)]
pub struct MemoryDraftStore {
    slot: String,
    raw: Mutex<Option<String>>,
}

impl Default for MemoryDraftStore {
    fn default() -> Self {
        Self {
            slot: DEFAULT_DRAFT_SLOT.to_string(),
            raw: Mutex::new(None),
        }
    }
}

impl MemoryDraftStore {
    /// Start with the slot holding `raw` verbatim.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
            ..Self::default()
        }
    }

    pub fn raw(&self) -> Option<String> {
        mutex_lock(&self.raw, SOURCE, "raw").clone()
    }
}

impl DraftStore for MemoryDraftStore {
    fn slot(&self) -> &str {
        &self.slot
    }

    fn save(&self, record: &DraftRecord) -> Result<(), DraftStoreError> {
        let json = serde_json::to_string(record)?;
        *mutex_lock(&self.raw, SOURCE, "save") = Some(json);
        Ok(())
    }

    fn restore(&self) -> Result<Option<DraftRecord>, DraftStoreError> {
        let raw = mutex_lock(&self.raw, SOURCE, "restore").clone();
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn clear(&self) -> Result<(), DraftStoreError> {
        *mutex_lock(&self.raw, SOURCE, "clear") = None;
        Ok(())
    }
}
