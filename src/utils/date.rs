//! Calendar helpers: week windows and date parsing.

use crate::config::WeekStart;
use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Duration, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

pub fn require_date(s: &str) -> AppResult<NaiveDate> {
    parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

/// First day of the week containing `d`.
pub fn week_start(d: NaiveDate, first: WeekStart) -> NaiveDate {
    let offset = match first {
        WeekStart::Sunday => d.weekday().num_days_from_sunday(),
        WeekStart::Monday => d.weekday().num_days_from_monday(),
    };
    d - Duration::days(offset as i64)
}

/// The seven dates of the week starting at `start`.
pub fn week_days(start: NaiveDate) -> Vec<NaiveDate> {
    (0..7).map(|i| start + Duration::days(i)).collect()
}

pub fn week_end(start: NaiveDate) -> NaiveDate {
    start + Duration::days(6)
}

/// Resolve a `--week` argument (any date inside the week, or nothing for this week).
pub fn resolve_week(arg: Option<&str>, first: WeekStart) -> AppResult<NaiveDate> {
    let d = match arg {
        Some(s) => require_date(s)?,
        None => today(),
    };
    Ok(week_start(d, first))
}

/// French short day label, as printed in week headers ("dim. 09/03").
pub fn day_label(d: NaiveDate) -> String {
    let name = match d.weekday() {
        chrono::Weekday::Sun => "dim.",
        chrono::Weekday::Mon => "lun.",
        chrono::Weekday::Tue => "mar.",
        chrono::Weekday::Wed => "mer.",
        chrono::Weekday::Thu => "jeu.",
        chrono::Weekday::Fri => "ven.",
        chrono::Weekday::Sat => "sam.",
    };
    format!("{} {}", name, d.format("%d/%m"))
}
