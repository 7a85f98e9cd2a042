pub mod catalog;
pub mod daily_activity;
pub mod progress_state;
pub mod review_card;
pub mod review_session;
pub mod sm2;
pub mod video_progress;

pub use catalog::{Catalog, Question, QuestionOptions, Video, WrongAnswer, YearCatalog};
pub use daily_activity::DailyActivity;
pub use progress_state::{ProgressState, Settings, SettingsPatch, TodayProgress};
pub use review_card::{ReviewCard, ReviewSchedule};
pub use review_session::ReviewSession;
pub use video_progress::{AnswerChoice, VideoProgress};
