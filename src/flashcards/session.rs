//! A study session over one set: stack selection, answers and reset,
//! with statuses persisted through an injected [`StatusStore`].

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::clock::Clock;

use super::algorithm::{
    apply_grade, preview_intervals, Grade, SchedulerError, SchedulerPolicy, Swipe,
};
use super::models::{Card, CardStatus, ReviewStats, StatusMap};
use super::stack::{initial_stack, next_due, review_stats};
use super::storage::{StatusStore, StatusStoreError};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Store(#[from] StatusStoreError),

    #[error("Card {card_id} is not part of set {set_id}")]
    UnknownCard { set_id: String, card_id: String },
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Result of answering one card
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    pub status: CardStatus,
    /// False when the store rejected the write; the update stays queued
    /// in the session and is retried by the next answer or [`StudySession::flush`]
    pub persisted: bool,
}

/// Default statuses for every card of a set, all due at `now`
pub fn reset_statuses(cards: &[Card], now: DateTime<Utc>) -> StatusMap {
    cards
        .iter()
        .map(|card| (card.id.clone(), CardStatus::new(now)))
        .collect()
}

pub struct StudySession<'a> {
    set_id: String,
    cards: Vec<Card>,
    statuses: StatusMap,
    store: &'a dyn StatusStore,
    clock: &'a dyn Clock,
    policy: SchedulerPolicy,
    pending_write: bool,
}

impl<'a> StudySession<'a> {
    /// Load the statuses of a set and start a session on `cards`
    pub fn open(
        set_id: impl Into<String>,
        cards: Vec<Card>,
        store: &'a dyn StatusStore,
        clock: &'a dyn Clock,
        policy: SchedulerPolicy,
    ) -> Result<Self> {
        let set_id = set_id.into();
        let statuses = store.get(&set_id)?;
        log::debug!(
            "Opened session on set {} ({} cards, {} statuses)",
            set_id,
            cards.len(),
            statuses.len()
        );

        Ok(Self {
            set_id,
            cards,
            statuses,
            store,
            clock,
            policy,
            pending_write: false,
        })
    }

    pub fn set_id(&self) -> &str {
        &self.set_id
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn policy(&self) -> &SchedulerPolicy {
        &self.policy
    }

    pub fn status(&self, card_id: &str) -> Option<&CardStatus> {
        self.statuses.get(card_id)
    }

    pub fn statuses(&self) -> &StatusMap {
        &self.statuses
    }

    /// Cards due right now, in set order
    pub fn stack(&self) -> Vec<&Card> {
        initial_stack(&self.cards, &self.statuses, self.clock.now())
    }

    pub fn stats(&self) -> ReviewStats {
        review_stats(&self.cards, &self.statuses, self.clock.now())
    }

    /// When the next card becomes due, if none is due now
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        next_due(&self.cards, &self.statuses, self.clock.now())
    }

    /// Intervals each swipe would give a card: `[left, right]`
    pub fn preview(&self, card_id: &str) -> Option<[u32; 2]> {
        self.find_card(card_id)?;
        Some(preview_intervals(
            self.statuses.get(card_id),
            self.clock.now(),
            &self.policy,
        ))
    }

    /// Record an answer graded on the 0-5 scale
    pub fn answer(&mut self, card_id: &str, quality: f64) -> Result<AnswerOutcome> {
        let grade = Grade::new(quality)?;
        self.apply(card_id, grade)
    }

    pub fn swipe(&mut self, card_id: &str, swipe: Swipe) -> Result<AnswerOutcome> {
        self.apply(card_id, swipe.grade())
    }

    fn apply(&mut self, card_id: &str, grade: Grade) -> Result<AnswerOutcome> {
        if self.find_card(card_id).is_none() {
            return Err(SessionError::UnknownCard {
                set_id: self.set_id.clone(),
                card_id: card_id.to_string(),
            });
        }

        let status = apply_grade(self.statuses.get(card_id), grade, self.clock.now(), &self.policy);
        self.statuses.insert(card_id.to_string(), status.clone());
        self.pending_write = true;

        let persisted = match self.flush() {
            Ok(()) => true,
            Err(e) => {
                log::warn!(
                    "Could not save review of card {} in set {}, will retry: {}",
                    card_id,
                    self.set_id,
                    e
                );
                false
            }
        };

        Ok(AnswerOutcome { status, persisted })
    }

    /// Write queued updates to the store. No-op when nothing is pending.
    pub fn flush(&mut self) -> Result<()> {
        if !self.pending_write {
            return Ok(());
        }
        self.store.put(&self.set_id, &self.statuses)?;
        self.pending_write = false;
        Ok(())
    }

    pub fn has_pending_write(&self) -> bool {
        self.pending_write
    }

    /// Restart the set: every card back to the default status.
    ///
    /// The in-memory statuses only change once the store accepted the
    /// new map, so a failed reset leaves the session as it was.
    pub fn reset(&mut self) -> Result<()> {
        let statuses = reset_statuses(&self.cards, self.clock.now());
        self.store.put(&self.set_id, &statuses)?;

        self.statuses = statuses;
        self.pending_write = false;
        log::info!("Reset {} cards in set {}", self.cards.len(), self.set_id);
        Ok(())
    }

    fn find_card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }
}
