// src/export/logic.rs

use crate::core::timesheet::Timesheet;
use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::fs_utils::{default_file_name, ensure_writable};
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{build_doc, build_rows, title_lines};
use crate::export::pdf::export_pdf;
use crate::export::xlsx::export_xlsx;
use crate::ui::messages::{info, success, warning};
use crate::utils::path::expand_tilde;
use std::collections::HashMap;
use std::path::PathBuf;

/// Timesheet export front door.
pub struct ExportLogic;

impl ExportLogic {
    /// Write `ts` in `format`. Without `file`, the default name is used in the
    /// current directory. `project_numbers` maps project ids to their numbers.
    pub fn export(
        ts: &Timesheet,
        company: &str,
        project_numbers: &HashMap<i64, String>,
        format: ExportFormat,
        file: Option<&str>,
        force: bool,
    ) -> AppResult<PathBuf> {
        let path = match file {
            Some(f) => expand_tilde(f),
            None => PathBuf::from(default_file_name(&ts.group, ts.week_start, format)),
        };

        ensure_writable(&path, force)?;

        if ts.users_with_hours().next().is_none() {
            warning("No hours recorded for this group and week; exporting an empty sheet.");
        }

        info(format!("Exporting to {}: {}", format.label(), path.display()));

        match format {
            ExportFormat::Csv => export_csv(&build_rows(ts, company, project_numbers), &path)?,
            ExportFormat::Json => export_json(&build_doc(ts, company, project_numbers), &path)?,
            ExportFormat::Xlsx => export_xlsx(&build_rows(ts, company, project_numbers), &path)?,
            ExportFormat::Pdf => export_pdf(
                &title_lines(ts, company),
                &build_rows(ts, company, project_numbers),
                &path,
            )?,
        }

        success(format!("{} export completed: {}", format.label(), path.display()));
        Ok(path)
    }
}
