//! Per-item session outcome: watched flag and the last multiple-choice answer.
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four options of a vocabulary question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerChoice {
    A,
    B,
    C,
    D,
}

impl AnswerChoice {
    pub const ALL: [AnswerChoice; 4] = [
        AnswerChoice::A,
        AnswerChoice::B,
        AnswerChoice::C,
        AnswerChoice::D,
    ];

    pub fn letter(self) -> char {
        match self {
            AnswerChoice::A => 'A',
            AnswerChoice::B => 'B',
            AnswerChoice::C => 'C',
            AnswerChoice::D => 'D',
        }
    }
}

impl fmt::Display for AnswerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("'{0}' is not one of A, B, C, D")]
pub struct InvalidAnswerChoice(pub String);

impl FromStr for AnswerChoice {
    type Err = InvalidAnswerChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(AnswerChoice::A),
            "B" => Ok(AnswerChoice::B),
            "C" => Ok(AnswerChoice::C),
            "D" => Ok(AnswerChoice::D),
            _ => Err(InvalidAnswerChoice(s.to_string())),
        }
    }
}

/// `answer_selected` and `is_correct` are only ever written together
/// through [`VideoProgress::record_answer`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoProgress {
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watched_at: Option<DateTime<Local>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_selected: Option<AnswerChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

impl VideoProgress {
    pub fn mark_watched(&mut self, at: DateTime<Local>) {
        self.completed = true;
        self.watched_at = Some(at);
    }

    pub fn record_answer(&mut self, answer: AnswerChoice, is_correct: bool) {
        self.answer_selected = Some(answer);
        self.is_correct = Some(is_correct);
    }

    pub fn is_answered(&self) -> bool {
        self.answer_selected.is_some()
    }

    pub fn answered_wrong(&self) -> bool {
        self.is_correct == Some(false)
    }
}
