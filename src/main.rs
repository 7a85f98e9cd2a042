mod app;
use video_study_app::*;

use app::StudyApp;
use clap::Parser;
use clock::SimulatedClock;
use config::AppConfig;
use database::{BlobStorage, MemoryStorage, SqliteStorage};
use export::json::import_catalog;
use std::rc::Rc;

fn open_storage(config: &AppConfig) -> Box<dyn BlobStorage> {
    if config.ephemeral {
        log::info!("Keeping progress in memory only");
        return Box::new(MemoryStorage::new());
    }
    match SqliteStorage::open(&config.database) {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            log::error!(
                "Failed to open {}: {}; progress will not be saved",
                config.database.display(),
                e
            );
            Box::new(MemoryStorage::new())
        }
    }
}

fn load_catalog(config: &AppConfig) -> Catalog {
    match &config.catalog {
        Some(path) => import_catalog(path).unwrap_or_else(|e| {
            log::error!("Failed to load catalog {}: {}", path.display(), e);
            Catalog::sample()
        }),
        None => Catalog::sample(),
    }
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = AppConfig::parse();

    let clock = Rc::new(SimulatedClock::new());
    let ledger = ProgressLedger::new(open_storage(&config), Box::new(Rc::clone(&clock)));
    let catalog = load_catalog(&config);

    log::info!(
        "Loaded {} years, {} videos; {} completed, streak {}",
        catalog.years.len(),
        catalog.total_videos(),
        ledger.completed_count(),
        ledger.streak()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([520.0, 760.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Video Study",
        options,
        Box::new(move |cc| Ok(Box::new(StudyApp::new(cc, ledger, catalog, clock)))),
    )
}
