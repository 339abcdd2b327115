// crates/core/src/paths.rs
//! Centralized path functions for benchview storage locations.
//!
//! Single source of truth — eliminates ad-hoc `dirs::home_dir().join(...)`
//! scattered across crates.

use std::path::PathBuf;

/// Data root: `$BENCHVIEW_DATA_DIR` if set, else `~/.benchview/`.
pub fn data_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("BENCHVIEW_DATA_DIR") {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    dirs::home_dir().map(|d| d.join(".benchview"))
}

/// SQLite database file: `<data_dir>/benchview.db`.
pub fn db_path() -> Option<PathBuf> {
    data_dir().map(|d| d.join("benchview.db"))
}

/// Captured device logs: `<data_dir>/logs/`.
pub fn logs_dir() -> Option<PathBuf> {
    data_dir().map(|d| d.join("logs"))
}
