//! The video catalog, grouped by academic year.
//! Each video may carry one multiple-choice vocabulary question.

use super::{AnswerChoice, VideoProgress};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOptions {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

impl QuestionOptions {
    pub fn get(&self, choice: AnswerChoice) -> &str {
        match choice {
            AnswerChoice::A => &self.a,
            AnswerChoice::B => &self.b,
            AnswerChoice::C => &self.c,
            AnswerChoice::D => &self.d,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_text: String,
    pub options: QuestionOptions,
    #[serde(default)]
    pub correct_answer: Option<AnswerChoice>,
}

impl Question {
    /// Without an answer key every choice counts as incorrect.
    pub fn is_correct(&self, choice: AnswerChoice) -> bool {
        self.correct_answer == Some(choice)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub youtube_id: String,
    pub video_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration_seconds: u32,
    #[serde(default)]
    pub question: Option<Question>,
}

impl Video {
    pub fn youtube_link(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.youtube_id)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearCatalog {
    pub year: u32,
    #[serde(default)]
    pub playlist_title: String,
    pub videos: Vec<Video>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub years: Vec<YearCatalog>,
}

/// An answered-wrong item located in the catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct WrongAnswer {
    pub item_id: String,
    pub year: u32,
    /// 1-based position inside the year.
    pub index: usize,
    pub answer_selected: Option<AnswerChoice>,
}

impl Catalog {
    pub fn year(&self, year: u32) -> Option<&YearCatalog> {
        self.years.iter().find(|y| y.year == year)
    }

    /// `index` is 1-based, like the question numbers shown to the learner.
    pub fn video(&self, year: u32, index: usize) -> Option<&Video> {
        let year = self.year(year)?;
        index.checked_sub(1).and_then(|i| year.videos.get(i))
    }

    pub fn locate(&self, item_id: &str) -> Option<(u32, usize)> {
        self.years.iter().find_map(|y| {
            y.videos
                .iter()
                .position(|v| v.youtube_id == item_id)
                .map(|i| (y.year, i + 1))
        })
    }

    pub fn find(&self, item_id: &str) -> Option<&Video> {
        let (year, index) = self.locate(item_id)?;
        self.video(year, index)
    }

    /// Picks a year uniformly, then a 1-based question within it.
    /// Years without videos are skipped; an empty catalog yields `None`.
    pub fn random_video<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(u32, usize)> {
        let years: Vec<&YearCatalog> = self.years.iter().filter(|y| !y.videos.is_empty()).collect();
        let year = years.choose(rng)?;
        Some((year.year, rng.gen_range(1..=year.videos.len())))
    }

    pub fn total_videos(&self) -> usize {
        self.years.iter().map(|y| y.videos.len()).sum()
    }

    /// Newest year first, then by question number.
    pub fn wrong_answers(&self, progress: &BTreeMap<String, VideoProgress>) -> Vec<WrongAnswer> {
        let mut wrong: Vec<WrongAnswer> = self
            .years
            .iter()
            .flat_map(|y| {
                y.videos.iter().enumerate().filter_map(move |(i, v)| {
                    progress
                        .get(&v.youtube_id)
                        .filter(|p| p.answered_wrong())
                        .map(|p| WrongAnswer {
                            item_id: v.youtube_id.clone(),
                            year: y.year,
                            index: i + 1,
                            answer_selected: p.answer_selected,
                        })
                })
            })
            .collect();
        wrong.sort_by(|a, b| b.year.cmp(&a.year).then(a.index.cmp(&b.index)));
        wrong
    }

    /// A tiny catalog so the app has something to show without a data file.
    pub fn sample() -> Self {
        let question = |text: &str, opts: [&str; 4], key: AnswerChoice| Question {
            question_text: text.to_string(),
            options: QuestionOptions {
                a: opts[0].to_string(),
                b: opts[1].to_string(),
                c: opts[2].to_string(),
                d: opts[3].to_string(),
            },
            correct_answer: Some(key),
        };

        Catalog {
            years: vec![
                YearCatalog {
                    year: 113,
                    playlist_title: "Vocabulary 113".to_string(),
                    videos: vec![
                        Video {
                            youtube_id: "sample-113-1".to_string(),
                            video_title: "Word of the day: reluctant".to_string(),
                            description: String::new(),
                            duration_seconds: 95,
                            question: Some(question(
                                "He was ____ to admit his mistake.",
                                ["reluctant", "eager", "proud", "quick"],
                                AnswerChoice::A,
                            )),
                        },
                        Video {
                            youtube_id: "sample-113-2".to_string(),
                            video_title: "Word of the day: abundant".to_string(),
                            description: String::new(),
                            duration_seconds: 80,
                            question: Some(question(
                                "Fresh water is ____ in this region.",
                                ["scarce", "abundant", "hollow", "fragile"],
                                AnswerChoice::B,
                            )),
                        },
                    ],
                },
                YearCatalog {
                    year: 112,
                    playlist_title: "Vocabulary 112".to_string(),
                    videos: vec![Video {
                        youtube_id: "sample-112-1".to_string(),
                        video_title: "Listening warm-up".to_string(),
                        description: String::new(),
                        duration_seconds: 120,
                        question: None,
                    }],
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_video_lookup_is_one_based() {
        let catalog = Catalog::sample();
        assert_eq!(
            catalog.video(113, 1).unwrap().youtube_id,
            "sample-113-1"
        );
        assert!(catalog.video(113, 0).is_none());
        assert!(catalog.video(113, 3).is_none());
        assert!(catalog.video(100, 1).is_none());
    }

    #[test]
    fn test_random_video_is_always_playable() {
        let catalog = Catalog::sample();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let (year, index) = catalog.random_video(&mut rng).unwrap();
            assert!(catalog.video(year, index).is_some());
        }
    }

    #[test]
    fn test_random_video_skips_empty_years() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Catalog::default().random_video(&mut rng), None);

        let mut catalog = Catalog::sample();
        catalog.years[0].videos.clear();
        for _ in 0..10 {
            assert_eq!(catalog.random_video(&mut rng), Some((112, 1)));
        }
    }

    #[test]
    fn test_locate() {
        let catalog = Catalog::sample();
        assert_eq!(catalog.locate("sample-113-2"), Some((113, 2)));
        assert_eq!(catalog.locate("missing"), None);
        assert_eq!(catalog.total_videos(), 3);
    }

    #[test]
    fn test_question_without_key_is_never_correct() {
        let mut question = Catalog::sample().years[0].videos[0]
            .question
            .clone()
            .unwrap();
        assert!(question.is_correct(AnswerChoice::A));
        assert!(!question.is_correct(AnswerChoice::B));

        question.correct_answer = None;
        assert!(!question.is_correct(AnswerChoice::A));
    }

    #[test]
    fn test_wrong_answers_sorted_newest_year_first() {
        let catalog = Catalog::sample();
        let mut progress = BTreeMap::new();
        let mut wrong = VideoProgress::default();
        wrong.record_answer(AnswerChoice::C, false);
        progress.insert("sample-112-1".to_string(), wrong.clone());
        progress.insert("sample-113-2".to_string(), wrong);
        let mut right = VideoProgress::default();
        right.record_answer(AnswerChoice::A, true);
        progress.insert("sample-113-1".to_string(), right);

        let list = catalog.wrong_answers(&progress);
        let ids: Vec<&str> = list.iter().map(|w| w.item_id.as_str()).collect();
        assert_eq!(ids, vec!["sample-113-2", "sample-112-1"]);
        assert_eq!(list[0].index, 2);
        assert_eq!(list[0].answer_selected, Some(AnswerChoice::C));
    }

    #[test]
    fn test_parse_catalog_json() {
        let json = r#"{
  "years": [
    {
      "year": 111,
      "playlistTitle": "111",
      "videos": [
        {
          "youtubeId": "xyz",
          "videoTitle": "Q1",
          "durationSeconds": 60,
          "question": {
            "questionText": "She ____ the bus.",
            "options": { "A": "missed", "B": "mist", "C": "mast", "D": "must" },
            "correctAnswer": null
          }
        }
      ]
    }
  ]
}"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        let video = catalog.video(111, 1).unwrap();
        let question = video.question.as_ref().unwrap();
        assert_eq!(question.options.get(AnswerChoice::A), "missed");
        assert_eq!(question.correct_answer, None);
        assert_eq!(video.youtube_link(), "https://www.youtube.com/watch?v=xyz");
    }
}
