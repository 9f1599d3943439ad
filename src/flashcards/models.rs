//! Data models for the flashcard scheduler

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Easiness factor assigned to a card on first encounter
pub const DEFAULT_EASINESS: f64 = 2.5;

/// Easiness never drops below this value
pub const MIN_EASINESS: f64 = 1.3;

/// Interval (days) of a fresh card and of a card that was just failed
pub const RESET_INTERVAL_DAYS: u32 = 1;

pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Per-set map from card id to the card's scheduling state
pub type StatusMap = HashMap<String, CardStatus>;

/// A flashcard with question (front) and answer (back)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub front: String,
    pub back: String,
    /// Order of the card within its set
    #[serde(default)]
    pub position: i32,
}

impl Card {
    pub fn new(front: String, back: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            front,
            back,
            position: 0,
        }
    }
}

/// A study set: the unit a learner opens a session on
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySet {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub cards: Vec<Card>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StudySet {
    pub fn new(id: String, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description: None,
            cards: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a card at the end of the set
    pub fn push_card(&mut self, mut card: Card) {
        card.position = self.cards.len() as i32;
        self.cards.push(card);
        self.updated_at = Utc::now();
    }
}

/// Spaced repetition state of one card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardStatus {
    /// SM-2 easiness factor, never below [`MIN_EASINESS`]
    #[serde(default = "default_easiness")]
    pub easiness: f64,
    /// Days until the next scheduled review
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// Consecutive correct recalls
    #[serde(default)]
    pub repetitions: u32,
    /// Earliest instant (epoch milliseconds) the card may be shown again
    pub next_review: i64,
    #[serde(default)]
    pub is_completed: bool,
}

fn default_easiness() -> f64 {
    DEFAULT_EASINESS
}

fn default_interval() -> u32 {
    RESET_INTERVAL_DAYS
}

impl CardStatus {
    /// Status of a card never seen before: due immediately
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            easiness: DEFAULT_EASINESS,
            interval: RESET_INTERVAL_DAYS,
            repetitions: 0,
            next_review: now.timestamp_millis(),
            is_completed: false,
        }
    }

    /// Check if the card may be shown at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed && self.next_review <= now.timestamp_millis()
    }

    pub fn next_review_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.next_review).single()
    }
}

/// Statistics for one study set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_cards: usize,
    /// Cards without any recorded status
    pub new_cards: usize,
    /// Cards reviewed at least once and not completed
    pub learning_cards: usize,
    pub due_cards: usize,
    pub completed_cards: usize,
}

/// Set and card ids double as file names, so they must be a single path component
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\', '\0'])
}
