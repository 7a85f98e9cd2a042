//! Everything the learner has done, as one serializable value.
//!
//! The field names follow the persisted layout
//! `{ videoProgress, dailyGoal, activities, favorites, settings, reviewCards }`.
//! Missing fields fall back to their defaults so older or partial blobs load.

use super::{DailyActivity, ReviewCard, VideoProgress};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

pub const DEFAULT_DAILY_GOAL: u32 = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub dark_mode: bool,
    pub playback_speed: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            playback_speed: 1.0,
        }
    }
}

/// Partial settings update; `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettingsPatch {
    pub dark_mode: Option<bool>,
    pub playback_speed: Option<f32>,
}

impl Settings {
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(dark_mode) = patch.dark_mode {
            self.dark_mode = dark_mode;
        }
        if let Some(speed) = patch.playback_speed {
            self.playback_speed = speed;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TodayProgress {
    pub completed: u32,
    pub goal: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressState {
    pub video_progress: BTreeMap<String, VideoProgress>,
    pub daily_goal: u32,
    pub activities: Vec<DailyActivity>,
    pub favorites: BTreeSet<String>,
    pub settings: Settings,
    pub review_cards: BTreeMap<String, ReviewCard>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            video_progress: BTreeMap::new(),
            daily_goal: DEFAULT_DAILY_GOAL,
            activities: Vec::new(),
            favorites: BTreeSet::new(),
            settings: Settings::default(),
            review_cards: BTreeMap::new(),
        }
    }
}

impl ProgressState {
    /// Looks up the entry for `date`, inserting an empty one in date order if needed.
    pub fn activity_mut(&mut self, date: NaiveDate) -> &mut DailyActivity {
        let idx = match self.activities.binary_search_by_key(&date, |a| a.date) {
            Ok(idx) => idx,
            Err(idx) => {
                self.activities.insert(idx, DailyActivity::new(date));
                idx
            }
        };
        &mut self.activities[idx]
    }

    pub fn activity(&self, date: NaiveDate) -> Option<&DailyActivity> {
        self.activities.iter().find(|a| a.date == date)
    }

    /// Restores date order and merges duplicate days left by hand-edited blobs.
    pub fn normalize_activities(&mut self) {
        let mut merged: BTreeMap<NaiveDate, DailyActivity> = BTreeMap::new();
        for activity in self.activities.drain(..) {
            merged
                .entry(activity.date)
                .and_modify(|a| {
                    a.videos_watched += activity.videos_watched;
                    a.correct_answers += activity.correct_answers;
                })
                .or_insert(activity);
        }
        self.activities = merged.into_values().collect();
    }

    /// Consecutive active days ending today, or yesterday when today is still empty.
    pub fn streak(&self, today: NaiveDate) -> u32 {
        let days: HashSet<NaiveDate> = self.activities.iter().map(|a| a.date).collect();
        let yesterday = today - Duration::days(1);

        let anchor = if days.contains(&today) {
            today
        } else if days.contains(&yesterday) {
            yesterday
        } else {
            return 0;
        };

        let mut streak = 0;
        let mut expected = anchor;
        while days.contains(&expected) {
            streak += 1;
            expected = expected - Duration::days(1);
        }
        streak
    }

    /// Longest run of consecutive active days in the whole history.
    pub fn longest_streak(&self) -> u32 {
        let days: BTreeSet<NaiveDate> = self.activities.iter().map(|a| a.date).collect();

        let mut longest = 0;
        let mut current = 0;
        let mut previous: Option<NaiveDate> = None;
        for day in days {
            current = match previous {
                Some(prev) if day - prev == Duration::days(1) => current + 1,
                _ => 1,
            };
            longest = longest.max(current);
            previous = Some(day);
        }
        longest
    }

    pub fn today_progress(&self, today: NaiveDate) -> TodayProgress {
        TodayProgress {
            completed: self.activity(today).map(|a| a.videos_watched).unwrap_or(0),
            goal: self.daily_goal,
        }
    }

    pub fn completed_count(&self) -> usize {
        self.video_progress.values().filter(|p| p.completed).count()
    }

    pub fn answered_count(&self) -> usize {
        self.video_progress
            .values()
            .filter(|p| p.is_answered())
            .count()
    }

    pub fn wrong_answers(&self) -> Vec<String> {
        self.video_progress
            .iter()
            .filter(|(_, p)| p.answered_wrong())
            .map(|(id, _)| id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn state_with_days(days: &[u32]) -> ProgressState {
        let mut state = ProgressState::default();
        for &d in days {
            state.activity_mut(day(d)).videos_watched += 1;
        }
        state
    }

    #[test]
    fn test_defaults() {
        let state = ProgressState::default();
        assert_eq!(state.daily_goal, 10);
        assert!(!state.settings.dark_mode);
        assert_eq!(state.settings.playback_speed, 1.0);
        assert!(state.activities.is_empty());
    }

    #[test]
    fn test_activity_mut_keeps_dates_unique_and_sorted() {
        let mut state = ProgressState::default();
        state.activity_mut(day(5)).videos_watched += 1;
        state.activity_mut(day(3)).videos_watched += 1;
        state.activity_mut(day(5)).correct_answers += 1;

        let dates: Vec<NaiveDate> = state.activities.iter().map(|a| a.date).collect();
        assert_eq!(dates, vec![day(3), day(5)]);
        assert_eq!(state.activity(day(5)).unwrap().videos_watched, 1);
        assert_eq!(state.activity(day(5)).unwrap().correct_answers, 1);
    }

    #[test]
    fn test_normalize_merges_duplicates() {
        let mut state = ProgressState::default();
        state.activities = vec![
            DailyActivity {
                date: day(4),
                videos_watched: 1,
                correct_answers: 0,
            },
            DailyActivity {
                date: day(2),
                videos_watched: 2,
                correct_answers: 2,
            },
            DailyActivity {
                date: day(4),
                videos_watched: 3,
                correct_answers: 1,
            },
        ];

        state.normalize_activities();
        assert_eq!(state.activities.len(), 2);
        assert_eq!(state.activities[0].date, day(2));
        assert_eq!(state.activities[1].videos_watched, 4);
        assert_eq!(state.activities[1].correct_answers, 1);
    }

    #[test]
    fn test_streak_consecutive_days() {
        assert_eq!(state_with_days(&[10, 9, 8]).streak(day(10)), 3);
    }

    #[test]
    fn test_streak_gap_at_yesterday() {
        assert_eq!(state_with_days(&[10, 8]).streak(day(10)), 1);
    }

    #[test]
    fn test_streak_empty() {
        assert_eq!(ProgressState::default().streak(day(10)), 0);
    }

    #[test]
    fn test_streak_anchors_at_yesterday() {
        assert_eq!(state_with_days(&[9, 8, 6]).streak(day(10)), 2);
    }

    #[test]
    fn test_streak_stale_history() {
        assert_eq!(state_with_days(&[7, 6, 5]).streak(day(10)), 0);
    }

    #[test]
    fn test_longest_streak() {
        assert_eq!(state_with_days(&[1, 2, 3, 5, 6, 10]).longest_streak(), 3);
        assert_eq!(ProgressState::default().longest_streak(), 0);
    }

    #[test]
    fn test_settings_patch_is_partial() {
        let mut settings = Settings::default();
        settings.apply(&SettingsPatch {
            dark_mode: Some(true),
            playback_speed: None,
        });

        assert!(settings.dark_mode);
        assert_eq!(settings.playback_speed, 1.0);
    }

    #[test]
    fn test_partial_blob_uses_defaults() {
        let state: ProgressState = serde_json::from_str(r#"{"favorites":["x"]}"#).unwrap();
        assert_eq!(state.daily_goal, 10);
        assert!(state.favorites.contains("x"));
        assert!(state.review_cards.is_empty());
    }
}
