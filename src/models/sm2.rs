//! SM-2 (SuperMemo 2) spaced repetition algorithm implementation.
//!
//! The SM-2 algorithm calculates optimal review intervals based on recall quality:
//! - Each card has an ease factor (EF) that adjusts based on performance
//! - Quality grades 0-2: Reset repetitions, review again tomorrow
//! - Quality grades 3-5: Increase interval progressively (1 day → 6 days → EF multiplier)
//! - EF is adjusted after every review, failed ones included, and never falls below 1.3
//!
//! Everything here is pure: the caller passes the current time in.

use super::review_card::{DEFAULT_EASE_FACTOR, ReviewCard, ReviewSchedule};
use chrono::{DateTime, Days, Local};
use thiserror::Error;

pub const MIN_EASE_FACTOR: f64 = 1.3;
pub const MAX_QUALITY: u8 = 5;
/// Grades below this count as a failed recall.
pub const PASSING_QUALITY: u8 = 3;
/// Longest gap between two reviews, roughly a century.
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("quality {0} is outside the 0-5 range")]
    QualityOutOfRange(u8),
    #[error("next review date is out of range")]
    DueDateOutOfRange,
}

pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Calculates the next repetition count, ease factor and interval.
/// quality: 0-5 (0 = complete blackout, 5 = perfect response)
pub fn compute_next_review(current: ReviewSchedule, quality: u8) -> Result<ReviewSchedule> {
    if quality > MAX_QUALITY {
        return Err(SchedulerError::QualityOutOfRange(quality));
    }

    let (repetitions, interval) = if quality < PASSING_QUALITY {
        (0, 1)
    } else {
        let interval = match current.repetitions {
            0 => 1,
            1 => 6,
            _ => (f64::from(current.interval) * current.ease_factor)
                .round()
                .min(f64::from(MAX_INTERVAL_DAYS)) as u32,
        };
        (current.repetitions.saturating_add(1), interval)
    };

    // EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))
    let q = f64::from(quality);
    let ease_factor = (current.ease_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02)))
        .max(MIN_EASE_FACTOR);

    Ok(ReviewSchedule {
        repetitions,
        ease_factor,
        interval,
    })
}

/// Creates a card that is due immediately.
pub fn create_card(item_id: &str, now: DateTime<Local>) -> ReviewCard {
    ReviewCard {
        item_id: item_id.to_string(),
        repetitions: 0,
        ease_factor: DEFAULT_EASE_FACTOR,
        interval: 0,
        next_review_at: now,
        last_reviewed_at: now,
    }
}

/// Grades a card and moves its due date `interval` calendar days past `now`.
pub fn apply_review_outcome(
    card: &ReviewCard,
    quality: u8,
    now: DateTime<Local>,
) -> Result<ReviewCard> {
    let next = compute_next_review(card.schedule(), quality)?;

    // Calendar days keep the wall-clock time across DST changes.
    let next_review_at = now
        .checked_add_days(Days::new(u64::from(next.interval)))
        .ok_or(SchedulerError::DueDateOutOfRange)?;

    Ok(ReviewCard {
        item_id: card.item_id.clone(),
        repetitions: next.repetitions,
        ease_factor: next.ease_factor,
        interval: next.interval,
        next_review_at,
        last_reviewed_at: now,
    })
}

/// Returns the cards due by the end of `now`'s local day, most overdue first.
pub fn build_review_queue<'a, I>(cards: I, now: DateTime<Local>) -> Vec<ReviewCard>
where
    I: IntoIterator<Item = &'a ReviewCard>,
{
    let mut due: Vec<ReviewCard> = cards
        .into_iter()
        .filter(|card| card.is_due(now))
        .cloned()
        .collect();
    due.sort_by_key(|card| card.next_review_at);
    due
}
