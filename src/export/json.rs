//! JSON import/export: progress backups and video catalogs.

use crate::database::StorageError;
use crate::database::persist;
use crate::models::{Catalog, ProgressState};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid progress backup: {0}")]
    Backup(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Writes the progress state to `path` in the same layout it is stored in.
pub fn export_progress_to_path(state: &ProgressState, path: impl AsRef<Path>) -> Result<()> {
    let raw = persist::encode(state)?;
    fs::write(path.as_ref(), raw)?;
    log::info!("Progress exported to '{}'", path.as_ref().display());
    Ok(())
}

/// Reads a backup written by [`export_progress_to_path`], or a bare state object.
pub fn import_progress(path: impl AsRef<Path>) -> Result<ProgressState> {
    let raw = fs::read_to_string(path.as_ref())?;
    let state = persist::decode_lenient(&raw)?;
    log::info!(
        "Progress imported from '{}' ({} items)",
        path.as_ref().display(),
        state.video_progress.len()
    );
    Ok(state)
}

pub fn import_catalog(path: impl AsRef<Path>) -> Result<Catalog> {
    let raw = fs::read_to_string(path.as_ref())?;
    let catalog: Catalog = serde_json::from_str(&raw)?;
    log::info!(
        "Catalog loaded from '{}': {} years, {} videos",
        path.as_ref().display(),
        catalog.years.len(),
        catalog.total_videos()
    );
    Ok(catalog)
}
