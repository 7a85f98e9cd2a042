//! Per-day activity counters
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    pub date: NaiveDate,
    #[serde(default)]
    pub videos_watched: u32,
    #[serde(default)]
    pub correct_answers: u32,
}

impl DailyActivity {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            videos_watched: 0,
            correct_answers: 0,
        }
    }
}
