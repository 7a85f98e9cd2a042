//! The progress ledger: sole owner and writer of the learner's state.
//!
//! Every mutating call updates the in-memory state, writes the whole state
//! through to storage, then notifies each subscriber exactly once. Storage
//! failures are logged and never reach the caller.

use super::observers::{Observers, SubscriptionId};
use crate::clock::Clock;
use crate::database::BlobStorage;
use crate::database::persist;
use crate::models::sm2::{self, SchedulerError};
use crate::models::{
    AnswerChoice, ProgressState, ReviewCard, SettingsPatch, TodayProgress, VideoProgress,
};
use chrono::{DateTime, Local, NaiveDate};

pub struct ProgressLedger {
    state: ProgressState,
    storage: Box<dyn BlobStorage>,
    clock: Box<dyn Clock>,
    observers: Observers,
}

impl ProgressLedger {
    /// Loads the stored state, or starts from defaults if there is none.
    pub fn new(storage: Box<dyn BlobStorage>, clock: Box<dyn Clock>) -> Self {
        let state = persist::load_state(storage.as_ref());
        log::debug!(
            "Loaded progress: {} items, {} active days",
            state.video_progress.len(),
            state.activities.len()
        );
        Self {
            state,
            storage,
            clock,
            observers: Observers::default(),
        }
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    pub fn snapshot(&self) -> &ProgressState {
        &self.state
    }

    pub fn subscribe(&mut self, listener: impl Fn(&ProgressState) + 'static) -> SubscriptionId {
        self.observers.subscribe(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn commit(&mut self) {
        persist::save_state(self.storage.as_ref(), &self.state);
        log::trace!("Notifying {} subscriber(s)", self.observers.len());
        self.observers.notify(&self.state);
    }

    /// Marks an item as watched. Today's counter only moves the first time.
    pub fn mark_item_watched(&mut self, item_id: &str) {
        let now = self.now();
        let progress = self.state.video_progress.entry(item_id.to_string()).or_default();
        let already_completed = progress.completed;
        progress.mark_watched(now);

        if !already_completed {
            self.state.activity_mut(now.date_naive()).videos_watched += 1;
        }

        // first exposure enrolls the item in spaced repetition
        self.state
            .review_cards
            .entry(item_id.to_string())
            .or_insert_with(|| sm2::create_card(item_id, now));

        self.commit();
    }

    pub fn record_answer(&mut self, item_id: &str, answer: AnswerChoice, is_correct: bool) {
        let today = self.today();
        self.state
            .video_progress
            .entry(item_id.to_string())
            .or_default()
            .record_answer(answer, is_correct);

        if is_correct {
            self.state.activity_mut(today).correct_answers += 1;
        }

        self.commit();
    }

    /// Returns whether the item is a favorite afterwards.
    pub fn toggle_favorite(&mut self, item_id: &str) -> bool {
        let favorite = if self.state.favorites.remove(item_id) {
            false
        } else {
            self.state.favorites.insert(item_id.to_string());
            true
        };
        self.commit();
        favorite
    }

    pub fn set_daily_goal(&mut self, goal: u32) {
        self.state.daily_goal = goal;
        self.commit();
    }

    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.state.settings.apply(&patch);
        self.commit();
    }

    /// Grades an item and reschedules it. A bad quality changes nothing.
    pub fn review_item(&mut self, item_id: &str, quality: u8) -> Result<ReviewCard, SchedulerError> {
        let now = self.now();
        let card = match self.state.review_cards.get(item_id) {
            Some(card) => sm2::apply_review_outcome(card, quality, now)?,
            None => sm2::apply_review_outcome(&sm2::create_card(item_id, now), quality, now)?,
        };

        log::debug!(
            "Reviewed {} with quality {}: next in {} day(s)",
            item_id,
            quality,
            card.interval
        );
        self.state
            .review_cards
            .insert(item_id.to_string(), card.clone());
        self.commit();
        Ok(card)
    }

    /// Swaps in a whole state, e.g. from a backup.
    pub fn replace_state(&mut self, mut state: ProgressState) {
        state.normalize_activities();
        self.state = state;
        self.commit();
    }

    pub fn streak(&self) -> u32 {
        self.state.streak(self.today())
    }

    pub fn longest_streak(&self) -> u32 {
        self.state.longest_streak()
    }

    pub fn today_progress(&self) -> TodayProgress {
        self.state.today_progress(self.today())
    }

    pub fn completed_count(&self) -> usize {
        self.state.completed_count()
    }

    pub fn answered_count(&self) -> usize {
        self.state.answered_count()
    }

    pub fn wrong_answers(&self) -> Vec<String> {
        self.state.wrong_answers()
    }

    /// Unknown items read as untouched progress.
    pub fn progress_for(&self, item_id: &str) -> VideoProgress {
        self.state
            .video_progress
            .get(item_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_favorite(&self, item_id: &str) -> bool {
        self.state.favorites.contains(item_id)
    }

    pub fn review_card(&self, item_id: &str) -> Option<&ReviewCard> {
        self.state.review_cards.get(item_id)
    }

    pub fn due_reviews(&self) -> Vec<ReviewCard> {
        sm2::build_review_queue(self.state.review_cards.values(), self.now())
    }
}
