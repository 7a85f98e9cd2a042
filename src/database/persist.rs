//! Encoding of the progress state under its fixed storage key.
//!
//! Reads and writes are best effort: a missing or unreadable blob loads as
//! the default state, and a failed write is logged and dropped.

use super::{BlobStorage, Result};
use crate::models::ProgressState;
use serde::{Deserialize, Serialize};

pub const STORAGE_KEY: &str = "learn-gasat-progress";
pub const STATE_VERSION: u32 = 0;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: &'a ProgressState,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope {
    state: ProgressState,
    #[serde(default)]
    version: u32,
}

pub fn encode(state: &ProgressState) -> Result<String> {
    Ok(serde_json::to_string(&EnvelopeRef {
        state,
        version: STATE_VERSION,
    })?)
}

/// A blob written under another version still loads; fields this build
/// does not know are ignored and missing ones take their defaults.
pub fn decode(raw: &str) -> Result<ProgressState> {
    let envelope: Envelope = serde_json::from_str(raw)?;
    if envelope.version != STATE_VERSION {
        log::warn!(
            "Stored progress has version {}, expected {}; loading it anyway",
            envelope.version,
            STATE_VERSION
        );
    }
    let mut state = envelope.state;
    state.normalize_activities();
    Ok(state)
}

/// Like [`decode`], but also takes a bare state without the envelope.
pub fn decode_lenient(raw: &str) -> Result<ProgressState> {
    match decode(raw) {
        Ok(state) => Ok(state),
        Err(_) => {
            let mut state: ProgressState = serde_json::from_str(raw)?;
            state.normalize_activities();
            Ok(state)
        }
    }
}

pub fn load_state(storage: &dyn BlobStorage) -> ProgressState {
    match storage.get(STORAGE_KEY) {
        Ok(Some(raw)) => decode(&raw).unwrap_or_else(|e| {
            log::warn!("Stored progress is unreadable, starting fresh: {}", e);
            ProgressState::default()
        }),
        Ok(None) => ProgressState::default(),
        Err(e) => {
            log::warn!("Failed to read stored progress: {}", e);
            ProgressState::default()
        }
    }
}

/// Returns whether the write went through.
pub fn save_state(storage: &dyn BlobStorage, state: &ProgressState) -> bool {
    let written = encode(state).and_then(|raw| storage.set(STORAGE_KEY, &raw));
    match written {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Failed to persist progress: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStorage;

    #[test]
    fn test_blob_layout() {
        let raw = encode(&ProgressState::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["version"], 0);
        let state = &value["state"];
        for field in ["videoProgress", "dailyGoal", "activities", "favorites", "settings"] {
            assert!(state.get(field).is_some(), "missing {}", field);
        }
        assert_eq!(state["settings"]["playbackSpeed"], 1.0);
    }

    #[test]
    fn test_absent_blob_loads_defaults() {
        let storage = MemoryStorage::new();
        assert_eq!(load_state(&storage), ProgressState::default());
    }

    #[test]
    fn test_corrupt_blob_loads_defaults() {
        let storage = MemoryStorage::with_value(STORAGE_KEY, "{ not json");
        assert_eq!(load_state(&storage), ProgressState::default());
    }

    #[test]
    fn test_save_then_load() {
        let storage = MemoryStorage::new();
        let mut state = ProgressState::default();
        state.daily_goal = 25;
        state.favorites.insert("abc".to_string());

        assert!(save_state(&storage, &state));
        assert_eq!(load_state(&storage), state);
    }

    #[test]
    fn test_failed_save_reports_false() {
        let storage = MemoryStorage::new();
        storage.set_fail_writes(true);
        assert!(!save_state(&storage, &ProgressState::default()));
    }

    #[test]
    fn test_reads_legacy_blob() {
        let raw = r#"{"state":{"videoProgress":{"v1":{"videoId":"v1","completed":true,"watchedAt":"2026-01-05T10:00:00.000Z"}},"dailyGoal":12,"activities":[{"date":"2026-01-05","videosWatched":1,"correctAnswers":0}],"favorites":["v1"],"settings":{"darkMode":true,"playbackSpeed":1.5}},"version":0}"#;
        let state = decode(raw).unwrap();

        assert_eq!(state.daily_goal, 12);
        assert!(state.video_progress["v1"].completed);
        assert!(state.video_progress["v1"].watched_at.is_some());
        assert!(state.settings.dark_mode);
        assert_eq!(state.settings.playback_speed, 1.5);
        assert!(state.review_cards.is_empty());
    }

    #[test]
    fn test_other_version_still_loads() {
        let raw = r#"{"state":{"dailyGoal":7,"futureField":true},"version":1}"#;
        let state = decode(raw).unwrap();
        assert_eq!(state.daily_goal, 7);

        let storage = MemoryStorage::with_value(STORAGE_KEY, raw);
        assert_eq!(load_state(&storage).daily_goal, 7);
    }

    #[test]
    fn test_lenient_decode_takes_bare_state() {
        let state = decode_lenient(r#"{"dailyGoal":3}"#).unwrap();
        assert_eq!(state.daily_goal, 3);
        assert!(decode(r#"{"dailyGoal":3}"#).is_err());
    }
}
