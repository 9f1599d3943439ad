//! Where the cards of a study set come from
//!
//! The JSON source keeps one file per set:
//! ```text
//! {data-dir}/sets/
//! └── {set-id}.json   # StudySet with its cards
//! ```

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use super::models::{is_valid_id, Card, StudySet};
use super::storage::write_atomic;

#[derive(Error, Debug)]
pub enum CardSourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Study set not found: {0}")]
    SetNotFound(String),

    #[error("Invalid set id: {0:?}")]
    InvalidSetId(String),
}

pub type Result<T> = std::result::Result<T, CardSourceError>;

/// Ordered cards per set, immutable for the duration of a session
pub trait CardSource {
    fn load_set(&self, set_id: &str) -> Result<StudySet>;
}

/// Study sets stored as JSON files
pub struct JsonDeckSource {
    sets_path: PathBuf,
}

impl JsonDeckSource {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        let sets_path = data_dir.join("sets");
        fs::create_dir_all(&sets_path)?;
        Ok(Self { sets_path })
    }

    fn set_path(&self, set_id: &str) -> Result<PathBuf> {
        if !is_valid_id(set_id) {
            return Err(CardSourceError::InvalidSetId(set_id.to_string()));
        }
        Ok(self.sets_path.join(format!("{}.json", set_id)))
    }

    /// List all study sets, sorted by name
    pub fn list_sets(&self) -> Result<Vec<StudySet>> {
        let mut sets = Vec::new();
        for entry in fs::read_dir(&self.sets_path)? {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                match serde_json::from_str::<StudySet>(&content) {
                    Ok(set) => sets.push(set),
                    Err(e) => log::warn!("Skipping unreadable set {:?}: {}", path, e),
                }
            }
        }

        sets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sets)
    }

    pub fn save_set(&self, set: &StudySet) -> Result<()> {
        let path = self.set_path(&set.id)?;
        write_atomic(&path, &serde_json::to_string_pretty(set)?)?;
        log::debug!("Saved set {} ({} cards)", set.id, set.cards.len());
        Ok(())
    }

    /// Append a card to a set, creating the set if it does not exist yet
    pub fn add_card(&self, set_id: &str, front: String, back: String) -> Result<Card> {
        let mut set = match self.load_set(set_id) {
            Ok(set) => set,
            Err(CardSourceError::SetNotFound(_)) => {
                log::info!("Creating study set {}", set_id);
                StudySet::new(set_id.to_string(), set_id.to_string())
            }
            Err(e) => return Err(e),
        };

        let card = Card::new(front, back);
        set.push_card(card);
        self.save_set(&set)?;

        // push_card assigned the position
        Ok(set.cards[set.cards.len() - 1].clone())
    }
}

impl CardSource for JsonDeckSource {
    fn load_set(&self, set_id: &str) -> Result<StudySet> {
        let path = self.set_path(set_id)?;
        if !path.exists() {
            return Err(CardSourceError::SetNotFound(set_id.to_string()));
        }

        let content = fs::read_to_string(&path)?;
        let mut set: StudySet = serde_json::from_str(&content)?;
        set.cards.sort_by_key(|c| c.position);
        Ok(set)
    }
}
