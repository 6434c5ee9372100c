// src/export/fs_utils.rs

use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::ui::messages::info;
use crate::ui::prompt::confirm;
use chrono::NaiveDate;
use std::path::Path;

/// Check that `path` may be created or overwritten.
///
/// A missing file or `force` pass straight through; otherwise the user is asked.
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }

    if confirm(&format!("The file '{}' already exists. Overwrite?", path.display()))? {
        info("Existing file will be overwritten.");
        Ok(())
    } else {
        Err(AppError::Export(
            "cancelled: existing file not overwritten".into(),
        ))
    }
}

/// `heures_<group>_<week_start>.<ext>`, with blanks and separators replaced by `_`.
pub fn default_file_name(group: &str, week_start: NaiveDate, format: ExportFormat) -> String {
    let safe: String = group
        .trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
                '_'
            } else {
                c
            }
        })
        .collect();

    format!("heures_{}_{}.{}", safe, week_start.format("%Y-%m-%d"), format.as_str())
}
