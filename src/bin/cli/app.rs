use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use cardstack_lib::flashcards::{
    Card, CardSource, JsonDeckSource, StatusStore, StudySession, StudySet,
};
use cardstack_lib::{Config, SystemClock};

/// Shared application state for CLI commands
pub struct App {
    pub config: Config,
    pub source: JsonDeckSource,
    pub store: Box<dyn StatusStore>,
    pub clock: SystemClock,
}

impl App {
    pub fn new(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Config::load(path),
            None => Config::load_default(),
        }
        .context("Failed to load config")?;

        if data_dir.is_some() {
            config.storage.data_dir = data_dir;
        }
        let data_dir = config.data_dir().context("Failed to get data directory")?;

        let source = JsonDeckSource::new(data_dir.clone())
            .context("Failed to initialize set storage")?;
        let store = config
            .storage
            .open_store(&data_dir)
            .context("Failed to open status store")?;

        log::debug!("Using data directory {:?}", data_dir);

        Ok(Self {
            config,
            source,
            store,
            clock: SystemClock,
        })
    }

    pub fn load_set(&self, set_id: &str) -> Result<StudySet> {
        self.source
            .load_set(set_id)
            .with_context(|| format!("Failed to load set '{}'", set_id))
    }

    /// Open a session on a set with the configured policy
    pub fn open_session(&self, set: &StudySet) -> Result<StudySession<'_>> {
        StudySession::open(
            set.id.clone(),
            set.cards.clone(),
            self.store.as_ref(),
            &self.clock,
            self.config.scheduler.clone(),
        )
        .with_context(|| format!("Failed to load statuses for set '{}'", set.id))
    }
}

/// Find a card by id (exact, then prefix) or by its front text, ignoring case
pub fn find_card<'s>(set: &'s StudySet, query: &str) -> Result<&'s Card> {
    if let Some(card) = set.cards.iter().find(|c| c.id == query) {
        return Ok(card);
    }

    let query_lower = query.to_lowercase();
    let matches: Vec<&Card> = set
        .cards
        .iter()
        .filter(|c| c.id.starts_with(query) || c.front.to_lowercase() == query_lower)
        .collect();

    match matches.len() {
        0 => bail!("No card matching '{}' in set '{}'", query, set.id),
        1 => Ok(matches[0]),
        _ => {
            let listing = matches
                .iter()
                .map(|c| format!("  - {} {}", c.id, c.front))
                .collect::<Vec<_>>()
                .join("\n");
            bail!("Ambiguous card '{}'. Matches:\n{}", query, listing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> StudySet {
        let mut set = StudySet::new("verbs".to_string(), "Verbs".to_string());
        for (id, front) in [("a1", "Ser"), ("a2", "Estar"), ("b1", "Ir")] {
            let mut card = Card::new(front.to_string(), String::new());
            card.id = id.to_string();
            set.push_card(card);
        }
        set
    }

    #[test]
    fn test_find_card_by_id_and_prefix() {
        let set = sample_set();
        assert_eq!(find_card(&set, "a2").unwrap().front, "Estar");
        assert_eq!(find_card(&set, "b").unwrap().front, "Ir");
    }

    #[test]
    fn test_find_card_by_front_ignores_case() {
        let set = sample_set();
        assert_eq!(find_card(&set, "ser").unwrap().id, "a1");
        assert_eq!(find_card(&set, "ESTAR").unwrap().id, "a2");
    }

    #[test]
    fn test_find_card_ambiguous_or_missing() {
        let set = sample_set();
        let err = find_card(&set, "a").unwrap_err().to_string();
        assert!(err.contains("Ambiguous"));
        assert!(err.contains("a1") && err.contains("a2"));
        assert!(find_card(&set, "zz").is_err());
    }
}
