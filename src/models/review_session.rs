//! Review session over the due queue.
//! Handles multi-round review with SM-2 grading through the progress ledger.

use super::ReviewCard;
use super::sm2::{PASSING_QUALITY, SchedulerError};
use crate::ledger::ProgressLedger;

#[derive(Clone, Debug)]
pub struct SessionItem {
    pub item_id: String,
    pub passed: bool,
}

/// Manages a review session with multiple rounds.
/// Items that aren't recalled (grade < 3) are repeated in subsequent rounds.
pub struct ReviewSession {
    pub items: Vec<SessionItem>,
    pub current_round: Vec<usize>,
    pub current_index: usize,
    pub show_answer: bool,
    pub round_number: usize,
}

impl ReviewSession {
    /// Creates a session from the due queue, keeping its order.
    pub fn from_due_cards(cards: Vec<ReviewCard>) -> Self {
        let items: Vec<SessionItem> = cards
            .into_iter()
            .map(|card| SessionItem {
                item_id: card.item_id,
                passed: false,
            })
            .collect();
        let current_round = (0..items.len()).collect();

        Self {
            items,
            current_round,
            current_index: 0,
            show_answer: false,
            round_number: 1,
        }
    }

    pub fn current_item(&self) -> Option<&SessionItem> {
        self.current_round
            .get(self.current_index)
            .and_then(|&idx| self.items.get(idx))
    }

    pub fn toggle_answer(&mut self) {
        self.show_answer = !self.show_answer;
    }

    pub fn next_item(&mut self) {
        if self.current_index + 1 < self.current_round.len() {
            self.current_index += 1;
            self.show_answer = false;
        } else {
            self.start_next_round();
        }
    }

    /// Starts a new round with the items that failed this one.
    /// With nothing left to repeat the session is complete.
    fn start_next_round(&mut self) {
        let failed: Vec<usize> = self
            .current_round
            .iter()
            .copied()
            .filter(|&idx| self.items.get(idx).map(|i| !i.passed).unwrap_or(false))
            .collect();

        if !failed.is_empty() {
            self.current_round = failed;
            self.current_index = 0;
            self.show_answer = false;
            self.round_number += 1;
            log::debug!(
                "Review round {} with {} item(s)",
                self.round_number,
                self.current_round.len()
            );
        }
    }

    /// Grades the current item and reschedules it through the ledger.
    pub fn grade_current(
        &mut self,
        ledger: &mut ProgressLedger,
        quality: u8,
    ) -> Result<(), SchedulerError> {
        let Some(&idx) = self.current_round.get(self.current_index) else {
            return Ok(());
        };
        if let Some(item) = self.items.get_mut(idx) {
            ledger.review_item(&item.item_id, quality)?;
            item.passed = quality >= PASSING_QUALITY;
        }
        Ok(())
    }

    pub fn passed_count(&self) -> usize {
        self.current_round
            .iter()
            .filter(|&&idx| self.items.get(idx).map(|i| i.passed).unwrap_or(false))
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.current_round.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.total_count() - self.passed_count()
    }

    pub fn is_completed(&self) -> bool {
        self.current_round.is_empty() || self.passed_count() == self.total_count()
    }

    pub fn phase_message(&self) -> String {
        if self.round_number == 1 {
            format!("Round {}: {} items", self.round_number, self.total_count())
        } else {
            format!(
                "Round {} (Retry): {} items to retry",
                self.round_number,
                self.total_count()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::database::MemoryStorage;
    use chrono::{Local, TimeZone};

    fn ledger_with(items: &[&str]) -> ProgressLedger {
        let now = Local
            .with_ymd_and_hms(2026, 3, 10, 12, 0, 0)
            .earliest()
            .unwrap();
        let mut ledger = ProgressLedger::new(
            Box::new(MemoryStorage::new()),
            Box::new(FixedClock::at(now)),
        );
        for item in items {
            ledger.mark_item_watched(item);
        }
        ledger
    }

    #[test]
    fn test_all_pass_in_one_round() {
        let mut ledger = ledger_with(&["a", "b"]);
        let mut session = ReviewSession::from_due_cards(ledger.due_reviews());
        assert_eq!(session.total_count(), 2);

        for _ in 0..2 {
            session.grade_current(&mut ledger, 4).unwrap();
            session.next_item();
        }

        assert!(session.is_completed());
        assert_eq!(session.round_number, 1);
        assert!(ledger.due_reviews().is_empty());
    }

    #[test]
    fn test_failed_items_repeat() {
        let mut ledger = ledger_with(&["a", "b"]);
        let mut session = ReviewSession::from_due_cards(ledger.due_reviews());

        session.grade_current(&mut ledger, 1).unwrap();
        session.next_item();
        session.grade_current(&mut ledger, 5).unwrap();
        session.next_item();

        assert!(!session.is_completed());
        assert_eq!(session.round_number, 2);
        assert_eq!(session.total_count(), 1);
        assert_eq!(session.current_item().unwrap().item_id, "a");
        assert_eq!(session.phase_message(), "Round 2 (Retry): 1 items to retry");

        session.grade_current(&mut ledger, 3).unwrap();
        session.next_item();
        assert!(session.is_completed());
        assert_eq!(session.remaining_count(), 0);
    }

    #[test]
    fn test_bad_grade_keeps_item_pending() {
        let mut ledger = ledger_with(&["a"]);
        let mut session = ReviewSession::from_due_cards(ledger.due_reviews());

        assert!(session.grade_current(&mut ledger, 8).is_err());
        assert_eq!(session.passed_count(), 0);
        assert_eq!(session.remaining_count(), 1);
    }

    #[test]
    fn test_empty_session_is_complete() {
        let mut session = ReviewSession::from_due_cards(Vec::new());
        assert!(session.is_completed());
        assert!(session.current_item().is_none());
        session.next_item();
        assert!(session.is_completed());
    }
}
