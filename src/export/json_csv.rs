// src/export/json_csv.rs

use crate::errors::{AppError, AppResult};
use crate::export::model::{SheetRow, TimesheetDoc};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export JSON pretty-printed.
pub(crate) fn export_json(doc: &TimesheetDoc, path: &Path) -> AppResult<()> {
    let json_data = serde_json::to_string_pretty(doc)
        .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))?;

    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;
    Ok(())
}

/// Export CSV with the same block layout as the spreadsheet.
pub(crate) fn export_csv(rows: &[SheetRow], path: &Path) -> AppResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| AppError::Export(format!("CSV open error: {e}")))?;

    for row in rows {
        wtr.write_record(&row.cells)
            .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    }

    wtr.flush()?;
    Ok(())
}
