pub mod clock;
pub mod config;
pub mod database;
pub mod export;
pub mod ledger;
pub mod models;

pub use ledger::ProgressLedger;
pub use models::{Catalog, ProgressState, ReviewCard, ReviewSession, VideoProgress};
