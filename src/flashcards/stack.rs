//! Selection of the cards due in a study session

use chrono::{DateTime, Utc};

use super::models::{Card, CardStatus, ReviewStats, StatusMap};

/// Whether a card with the given (possibly missing) status is due at `now`.
/// A card without status is new and due immediately.
pub fn is_due(status: Option<&CardStatus>, now: DateTime<Utc>) -> bool {
    status.map_or(true, |s| s.is_due(now))
}

/// Cards of a set due for review at `now`, in the set's own order.
///
/// Completed cards and cards whose next review lies in the future are
/// left out. Statuses are only read.
pub fn initial_stack<'a>(
    cards: &'a [Card],
    statuses: &StatusMap,
    now: DateTime<Utc>,
) -> Vec<&'a Card> {
    cards
        .iter()
        .filter(|card| is_due(statuses.get(&card.id), now))
        .collect()
}

/// Earliest upcoming review among cards that are neither completed nor due yet
pub fn next_due(cards: &[Card], statuses: &StatusMap, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let now_ms = now.timestamp_millis();
    cards
        .iter()
        .filter_map(|card| statuses.get(&card.id))
        .filter(|s| !s.is_completed && s.next_review > now_ms)
        .min_by_key(|s| s.next_review)
        .and_then(CardStatus::next_review_at)
}

/// Review statistics for a set of cards
pub fn review_stats(cards: &[Card], statuses: &StatusMap, now: DateTime<Utc>) -> ReviewStats {
    let mut stats = ReviewStats {
        total_cards: cards.len(),
        ..Default::default()
    };

    for card in cards {
        let status = statuses.get(&card.id);
        match status {
            None => stats.new_cards += 1,
            Some(s) if s.is_completed => stats.completed_cards += 1,
            Some(_) => stats.learning_cards += 1,
        }
        if is_due(status, now) {
            stats.due_cards += 1;
        }
    }

    stats
}
