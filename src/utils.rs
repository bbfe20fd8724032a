//! Filesystem helpers for locating the prompt database.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use time::Date;

use crate::Config;

/// Gets the cross-platform database path.
///
/// Uses `PROMPTLIB_DB` when configured, otherwise
/// `{data_dir}/promptlib/prompts.db` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
///
/// # Errors
///
/// Returns an error if the data directory cannot be determined.
pub fn get_database_path(config: &Config) -> Result<PathBuf> {
    if let Some(path) = &config.database_path {
        return Ok(path.clone());
    }

    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join("promptlib").join("prompts.db"))
}

/// Ensures the parent directory of the database file exists.
///
/// # Errors
///
/// Returns an error if directory creation fails.
pub fn ensure_database_directory(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create database directory: {}", parent.display())
        })?;
    }
    Ok(())
}

/// File name used when exporting the library on a given day.
///
/// # Examples
///
/// ```
/// use promptlib::utils::export_file_name;
/// use time::macros::date;
///
/// assert_eq!(export_file_name(date!(2024-03-07)), "prompt-library-2024-03-07.json");
/// ```
pub fn export_file_name(date: Date) -> String {
    format!(
        "prompt-library-{:04}-{:02}-{:02}.json",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
