//! Command line / environment configuration for the desktop app.
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "video-study", about = "Self-study video lessons with spaced repetition")]
pub struct AppConfig {
    /// SQLite file holding the learner's progress
    #[arg(long, env = "VIDEO_STUDY_DB", default_value = "progress.sqlite3")]
    pub database: PathBuf,

    /// JSON video catalog; a small sample is used when omitted
    #[arg(long, env = "VIDEO_STUDY_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Keep progress in memory only
    #[arg(long)]
    pub ephemeral: bool,
}
