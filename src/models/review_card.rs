//! Spaced repetition state for a single learnable item.
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCard {
    pub item_id: String,
    pub repetitions: u32,
    pub ease_factor: f64,
    pub interval: u32,
    pub next_review_at: DateTime<Local>,
    pub last_reviewed_at: DateTime<Local>,
}

/// The part of a card the SM-2 step reads and produces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReviewSchedule {
    pub repetitions: u32,
    pub ease_factor: f64,
    pub interval: u32,
}

impl ReviewCard {
    pub fn schedule(&self) -> ReviewSchedule {
        ReviewSchedule {
            repetitions: self.repetitions,
            ease_factor: self.ease_factor,
            interval: self.interval,
        }
    }

    /// True when the card falls on or before the local calendar day of `now`.
    pub fn is_due(&self, now: DateTime<Local>) -> bool {
        self.next_review_at.date_naive() <= now.date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_due_includes_later_today() {
        let now = Local.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).earliest().unwrap();
        let tonight = Local.with_ymd_and_hms(2026, 3, 10, 23, 30, 0).earliest().unwrap();
        let card = ReviewCard {
            item_id: "abc".to_string(),
            repetitions: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            interval: 0,
            next_review_at: tonight,
            last_reviewed_at: now,
        };

        assert!(card.is_due(now));
    }

    #[test]
    fn test_schedule_copies_fields() {
        let now = Local.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).earliest().unwrap();
        let card = ReviewCard {
            item_id: "abc".to_string(),
            repetitions: 3,
            ease_factor: 2.2,
            interval: 15,
            next_review_at: now,
            last_reviewed_at: now,
        };

        let schedule = card.schedule();
        assert_eq!(schedule.repetitions, 3);
        assert_eq!(schedule.interval, 15);
        assert_eq!(schedule.ease_factor, 2.2);
    }
}
