use super::{role::Role, status::EntryStatus};
use crate::core::hours;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One shift record.
#[derive(Debug, Clone, Serialize)]
pub struct PunchEntry {
    pub id: i64,
    pub company_id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub project_id: i64,
    pub project_name: String,
    pub punch_in: NaiveDateTime,          // ⇔ punch_entries.punch_in (TEXT "YYYY-MM-DD HH:MM:SS")
    pub punch_out: Option<NaiveDateTime>, // NULL while the shift is open
    pub lunch_break: i64,                 // minutes
    pub total_hours: Option<f64>,
    pub status: EntryStatus,
    pub work_date: NaiveDate,
    pub week_start: NaiveDate,
    pub group: String,
    pub role: Role,
    pub machine: Option<String>,
    pub plate_number: Option<String>,
    pub approved_by: Option<String>,
    pub approved_at: Option<NaiveDateTime>,
    pub modified_by: Option<String>,
    pub modified_at: Option<NaiveDateTime>,
}

impl PunchEntry {
    /// Hours counted in reports. Open shifts count as zero.
    pub fn hours(&self) -> f64 {
        self.total_hours.unwrap_or(0.0)
    }

    /// Machine or plate, whichever the role recorded.
    pub fn equipment(&self) -> Option<&str> {
        self.machine.as_deref().or(self.plate_number.as_deref())
    }

    pub fn elapsed_label(&self, now: NaiveDateTime) -> String {
        hours::format_elapsed(hours::minutes_between(self.punch_in, now))
    }
}
