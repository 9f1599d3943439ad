//! SM-2 Spaced Repetition Algorithm
//!
//! Implementation of the SuperMemo 2 algorithm for calculating
//! review intervals based on the learner's answer quality.
//!
//! Grades are continuous on the 0-5 scale:
//! - 0: Complete blackout, no recall
//! - 1: Incorrect, but upon seeing answer, remembered
//! - 2: Incorrect, but answer seemed easy to recall
//! - 3: Correct response with serious difficulty
//! - 4: Correct response after hesitation
//! - 5: Perfect response with no hesitation
//!
//! The swipe interface grades a right swipe 4.5 and a left swipe 2.5.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::{CardStatus, MILLIS_PER_DAY, MIN_EASINESS, RESET_INTERVAL_DAYS};

pub const MIN_GRADE: f64 = 0.0;
pub const MAX_GRADE: f64 = 5.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("Invalid grade {0}: expected a value between 0 and 5")]
    InvalidGrade(f64),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;

/// A validated answer quality on the 0-5 scale
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Grade(f64);

impl Grade {
    pub fn new(quality: f64) -> Result<Self> {
        // NaN fails both comparisons
        if (MIN_GRADE..=MAX_GRADE).contains(&quality) {
            Ok(Self(quality))
        } else {
            Err(SchedulerError::InvalidGrade(quality))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Grade {
    type Error = SchedulerError;

    fn try_from(quality: f64) -> Result<Self> {
        Self::new(quality)
    }
}

/// Direction of a swipe on the review card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Swipe {
    /// "I knew it"
    Right,
    /// "I didn't know it"
    Left,
}

impl Swipe {
    pub fn grade(self) -> Grade {
        match self {
            Swipe::Right => Grade(4.5),
            Swipe::Left => Grade(2.5),
        }
    }
}

/// Tunable constants of the scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerPolicy {
    /// Grades strictly below this are failures
    pub passing_grade: f64,
    /// Interval after the first correct repetition
    pub first_interval_days: u32,
    /// Interval after the second correct repetition
    pub second_interval_days: u32,
    /// Upper bound for any interval
    pub max_interval_days: u32,
    /// Consecutive correct repetitions after which a card is completed
    pub completion_repetitions: u32,
}

impl Default for SchedulerPolicy {
    fn default() -> Self {
        Self {
            passing_grade: 3.0,
            first_interval_days: 1,
            second_interval_days: 6,
            max_interval_days: 3650,
            completion_repetitions: 4,
        }
    }
}

impl SchedulerPolicy {
    /// Check the policy for values that would break the scheduling invariants
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(MIN_GRADE..=MAX_GRADE).contains(&self.passing_grade) {
            return Err(format!(
                "passing_grade {} is outside the 0-5 scale",
                self.passing_grade
            ));
        }
        if self.first_interval_days == 0 {
            return Err("first_interval_days must be at least 1".to_string());
        }
        if self.second_interval_days < self.first_interval_days {
            return Err(
                "second_interval_days must not be shorter than first_interval_days".to_string(),
            );
        }
        if self.max_interval_days < self.second_interval_days {
            return Err(
                "max_interval_days must not be shorter than second_interval_days".to_string(),
            );
        }
        if self.completion_repetitions == 0 {
            return Err("completion_repetitions must be at least 1".to_string());
        }
        Ok(())
    }
}

/// EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02)), floored at 1.3
pub fn next_easiness(easiness: f64, grade: Grade) -> f64 {
    let distance = MAX_GRADE - grade.value();
    let easiness = easiness + (0.1 - distance * (0.08 + distance * 0.02));
    easiness.max(MIN_EASINESS)
}

/// Compute a card's next status after one answer.
///
/// A missing `status` means the card has never been reviewed and starts
/// from the defaults. The input is left untouched; the caller persists
/// the returned value.
pub fn review_card(
    status: Option<&CardStatus>,
    quality: f64,
    now: DateTime<Utc>,
    policy: &SchedulerPolicy,
) -> Result<CardStatus> {
    let grade = Grade::new(quality)?;
    Ok(apply_grade(status, grade, now, policy))
}

/// Same as [`review_card`] for an already validated grade
pub fn apply_grade(
    status: Option<&CardStatus>,
    grade: Grade,
    now: DateTime<Utc>,
    policy: &SchedulerPolicy,
) -> CardStatus {
    let current = status.cloned().unwrap_or_else(|| CardStatus::new(now));
    let easiness = next_easiness(current.easiness, grade);

    let (repetitions, interval) = if grade.value() < policy.passing_grade {
        (0, RESET_INTERVAL_DAYS)
    } else {
        let repetitions = current.repetitions.saturating_add(1);
        let interval = match repetitions {
            1 => policy.first_interval_days,
            2 => policy.second_interval_days,
            // f64 -> u32 casts saturate
            _ => (current.interval as f64 * easiness).round() as u32,
        };
        // stored statuses may carry a zero interval
        let interval = interval
            .max(current.interval)
            .max(RESET_INTERVAL_DAYS)
            .min(policy.max_interval_days);
        (repetitions, interval)
    };

    CardStatus {
        easiness,
        interval,
        repetitions,
        next_review: now.timestamp_millis() + interval as i64 * MILLIS_PER_DAY,
        is_completed: repetitions >= policy.completion_repetitions,
    }
}

/// Intervals a card would get for each swipe at `now`: `[left, right]`
pub fn preview_intervals(
    status: Option<&CardStatus>,
    now: DateTime<Utc>,
    policy: &SchedulerPolicy,
) -> [u32; 2] {
    let left = apply_grade(status, Swipe::Left.grade(), now, policy).interval;
    let right = apply_grade(status, Swipe::Right.grade(), now, policy).interval;
    [left, right]
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: u32) -> String {
    match days {
        0 => "now".to_string(),
        1..=6 => format!("{}d", days),
        7..=29 => format!("{}w", days / 7),
        30..=364 => format!("{}mo", days / 30),
        _ => format!("{}y", days / 365),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn policy() -> SchedulerPolicy {
        SchedulerPolicy::default()
    }

    fn status_with(repetitions: u32, interval: u32, easiness: f64) -> CardStatus {
        CardStatus {
            easiness,
            interval,
            repetitions,
            next_review: 0,
            is_completed: false,
        }
    }

    #[test]
    fn test_first_review_correct() {
        let now = Utc::now();
        let result = review_card(None, 4.5, now, &policy()).unwrap();

        assert_eq!(result.repetitions, 1);
        assert_eq!(result.interval, 1);
        assert_eq!(result.next_review, now.timestamp_millis() + MILLIS_PER_DAY);
        assert!(!result.is_completed);
    }

    #[test]
    fn test_second_review_correct() {
        let state = status_with(1, 1, 2.5);
        let result = review_card(Some(&state), 4.0, Utc::now(), &policy()).unwrap();

        assert_eq!(result.repetitions, 2);
        assert_eq!(result.interval, 6);
    }

    #[test]
    fn test_subsequent_review_correct() {
        let state = status_with(2, 10, 2.5);
        let result = review_card(Some(&state), 5.0, Utc::now(), &policy()).unwrap();

        // EF 2.5 -> 2.6, 10 * 2.6 = 26
        assert!((result.easiness - 2.6).abs() < 1e-9);
        assert_eq!(result.interval, 26);
        assert_eq!(result.repetitions, 3);
    }

    #[test]
    fn test_review_incorrect_resets() {
        let state = status_with(5, 30, 2.5);
        let result = review_card(Some(&state), 2.0, Utc::now(), &policy()).unwrap();

        assert_eq!(result.interval, 1);
        assert_eq!(result.repetitions, 0);
        assert!(!result.is_completed);
        assert!(result.easiness < 2.5);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let state = status_with(2, 6, 2.5);
        let before = state.clone();
        let _ = review_card(Some(&state), 1.0, Utc::now(), &policy()).unwrap();

        assert_eq!(state, before);
    }

    #[test]
    fn test_easiness_floor_holds_for_any_grade_sequence() {
        let grades = [0.0, 0.5, 1.0, 2.5, 0.0, 3.0, 0.0, 0.0, 5.0, 0.0, 2.9, 1.7];
        let mut state: Option<CardStatus> = None;
        let mut now = Utc::now();

        for _ in 0..5 {
            for &q in &grades {
                let next = review_card(state.as_ref(), q, now, &policy()).unwrap();
                assert!(next.easiness >= MIN_EASINESS, "easiness {} after q={}", next.easiness, q);
                state = Some(next);
                now += Duration::days(1);
            }
        }
    }

    #[test]
    fn test_failure_resets_from_any_repetition_count() {
        for repetitions in 1..20 {
            let state = status_with(repetitions, repetitions * 3, 2.1);
            for q in [0.0, 1.0, 2.0, 2.5, 2.99] {
                let result = review_card(Some(&state), q, Utc::now(), &policy()).unwrap();
                assert_eq!(result.repetitions, 0);
                assert_eq!(result.interval, 1);
            }
        }
    }

    #[test]
    fn test_intervals_grow_on_successive_passes() {
        for q in [3.0, 3.5, 4.0, 4.5, 5.0] {
            let mut state: Option<CardStatus> = None;
            let mut last_interval = 0;
            for _ in 0..12 {
                let next = review_card(state.as_ref(), q, Utc::now(), &policy()).unwrap();
                assert!(next.interval >= last_interval);
                last_interval = next.interval;
                state = Some(next);
            }
        }
    }

    #[test]
    fn test_zero_interval_from_store_recovers() {
        let now = Utc::now();
        let stored: CardStatus = serde_json::from_str(
            r#"{"easiness":2.5,"interval":0,"repetitions":2,"nextReview":0}"#,
        )
        .unwrap();

        let result = review_card(Some(&stored), 5.0, now, &policy()).unwrap();
        assert!(result.interval >= 1);
        assert!(result.next_review > now.timestamp_millis());

        let again = review_card(Some(&result), 5.0, now, &policy()).unwrap();
        assert!(again.interval > result.interval);
    }

    #[test]
    fn test_interval_is_capped() {
        let state = status_with(10, 3000, 2.5);
        let result = review_card(Some(&state), 5.0, Utc::now(), &policy()).unwrap();

        assert_eq!(result.interval, policy().max_interval_days);
    }

    #[test]
    fn test_completion_after_configured_repetitions() {
        let policy = policy();
        let mut state: Option<CardStatus> = None;

        for n in 1..=policy.completion_repetitions {
            let next = review_card(state.as_ref(), 4.5, Utc::now(), &policy).unwrap();
            assert_eq!(next.is_completed, n >= policy.completion_repetitions);
            state = Some(next);
        }
    }

    #[test]
    fn test_failure_reopens_completed_card() {
        let mut state = status_with(4, 40, 2.5);
        state.is_completed = true;
        let result = review_card(Some(&state), 1.0, Utc::now(), &policy()).unwrap();

        assert!(!result.is_completed);
    }

    #[test]
    fn test_invalid_grade_rejected() {
        let state = status_with(3, 15, 2.5);
        for q in [-0.1, 5.01, f64::NAN, f64::INFINITY] {
            let result = review_card(Some(&state), q, Utc::now(), &policy());
            assert!(matches!(result, Err(SchedulerError::InvalidGrade(_))));
        }
    }

    #[test]
    fn test_swipe_grades() {
        assert_eq!(Swipe::Right.grade().value(), 4.5);
        assert_eq!(Swipe::Left.grade().value(), 2.5);
        assert!(Swipe::Left.grade().value() < policy().passing_grade);
    }

    #[test]
    fn test_preview_intervals() {
        let state = status_with(1, 1, 2.5);
        assert_eq!(preview_intervals(Some(&state), Utc::now(), &policy()), [1, 6]);
        assert_eq!(preview_intervals(None, Utc::now(), &policy()), [1, 1]);
    }

    #[test]
    fn test_policy_validation() {
        assert!(policy().validate().is_ok());

        let bad = SchedulerPolicy {
            passing_grade: 7.0,
            ..policy()
        };
        assert!(bad.validate().is_err());

        let bad = SchedulerPolicy {
            first_interval_days: 0,
            ..policy()
        };
        assert!(bad.validate().is_err());

        let bad = SchedulerPolicy {
            max_interval_days: 3,
            ..policy()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0), "now");
        assert_eq!(format_interval(1), "1d");
        assert_eq!(format_interval(5), "5d");
        assert_eq!(format_interval(7), "1w");
        assert_eq!(format_interval(14), "2w");
        assert_eq!(format_interval(30), "1mo");
        assert_eq!(format_interval(90), "3mo");
        assert_eq!(format_interval(365), "1y");
        assert_eq!(format_interval(730), "2y");
    }
}
