//! Centralized path utilities
//!
//! All application paths in one place for consistency

use std::path::PathBuf;

use crate::constants::app;

/// Get the voxhire config directory (~/.voxhire)
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(app::CONFIG_DIR_NAME)
}

/// Get the database path (~/.voxhire/voxhire.db)
pub fn db_path() -> PathBuf {
    config_dir().join(app::DB_FILE_NAME)
}
