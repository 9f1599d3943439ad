//! Persistence of card statuses
//!
//! Statuses are read and written a whole set at a time. The JSON store
//! keeps one file per set:
//! ```text
//! {data-dir}/statuses/
//! └── {set-id}.json   # map of card id -> status
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use super::models::{is_valid_id, StatusMap};

#[derive(Error, Debug)]
pub enum StatusStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid set id: {0:?}")]
    InvalidSetId(String),

    #[error("Status store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StatusStoreError>;

/// Backing store for per-set status maps
pub trait StatusStore {
    /// Last saved statuses of a set, empty if none were saved
    fn get(&self, set_id: &str) -> Result<StatusMap>;

    /// Replace the whole status map of a set
    fn put(&self, set_id: &str, statuses: &StatusMap) -> Result<()>;

    /// Drop every status of a set
    fn delete_set(&self, set_id: &str) -> Result<()>;

    /// Drop the status of a single card
    fn remove_card(&self, set_id: &str, card_id: &str) -> Result<()> {
        let mut statuses = self.get(set_id)?;
        if statuses.remove(card_id).is_some() {
            self.put(set_id, &statuses)?;
        }
        Ok(())
    }
}

fn check_set_id(set_id: &str) -> Result<()> {
    if is_valid_id(set_id) {
        Ok(())
    } else {
        Err(StatusStoreError::InvalidSetId(set_id.to_string()))
    }
}

/// In-memory store, used for tests and throwaway sessions
#[derive(Default)]
pub struct MemoryStatusStore {
    sets: Mutex<HashMap<String, StatusMap>>,
}

impl MemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, StatusMap>>> {
        self.sets
            .lock()
            .map_err(|e| StatusStoreError::Unavailable(e.to_string()))
    }
}

impl StatusStore for MemoryStatusStore {
    fn get(&self, set_id: &str) -> Result<StatusMap> {
        Ok(self.lock()?.get(set_id).cloned().unwrap_or_default())
    }

    fn put(&self, set_id: &str, statuses: &StatusMap) -> Result<()> {
        self.lock()?.insert(set_id.to_string(), statuses.clone());
        Ok(())
    }

    fn delete_set(&self, set_id: &str) -> Result<()> {
        self.lock()?.remove(set_id);
        Ok(())
    }
}

/// Store writing one JSON file per set
pub struct JsonStatusStore {
    /// Directory holding the `{set-id}.json` files
    statuses_path: PathBuf,
}

impl JsonStatusStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        let statuses_path = data_dir.join("statuses");
        fs::create_dir_all(&statuses_path)?;
        Ok(Self { statuses_path })
    }

    fn set_path(&self, set_id: &str) -> PathBuf {
        self.statuses_path.join(format!("{}.json", set_id))
    }
}

/// Replace `path` through a sibling temp file and a rename.
///
/// Readers see either the old content or the new one, never a partial file.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    Ok(())
}

impl StatusStore for JsonStatusStore {
    fn get(&self, set_id: &str) -> Result<StatusMap> {
        check_set_id(set_id)?;
        let path = self.set_path(set_id);
        if !path.exists() {
            return Ok(StatusMap::new());
        }

        let content = fs::read_to_string(&path)?;
        let statuses: StatusMap = serde_json::from_str(&content)?;
        Ok(statuses)
    }

    fn put(&self, set_id: &str, statuses: &StatusMap) -> Result<()> {
        check_set_id(set_id)?;
        let path = self.set_path(set_id);
        write_atomic(&path, &serde_json::to_string_pretty(statuses)?)?;

        log::debug!("Saved {} statuses for set {}", statuses.len(), set_id);
        Ok(())
    }

    fn delete_set(&self, set_id: &str) -> Result<()> {
        check_set_id(set_id)?;
        let path = self.set_path(set_id);
        if path.exists() {
            fs::remove_file(&path)?;
            log::info!("Deleted statuses for set {}", set_id);
        }
        Ok(())
    }
}
