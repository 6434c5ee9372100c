//! Hour arithmetic shared by punch-out, project switches, approver edits and reports.

use crate::errors::{AppError, AppResult};
use crate::models::PunchEntry;
use chrono::NaiveDateTime;

/// Lunch durations offered at punch-out, in minutes.
pub const LUNCH_OPTIONS: [i64; 5] = [0, 15, 30, 45, 60];

/// Upper bound for a custom lunch entry.
pub const MAX_LUNCH_MINUTES: i64 = 120;

/// Whole minutes from `start` to `end`, truncated toward zero.
pub fn minutes_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_minutes()
}

/// Minutes actually worked. May be negative for malformed shifts.
pub fn worked_minutes(punch_in: NaiveDateTime, punch_out: NaiveDateTime, lunch: i64) -> i64 {
    minutes_between(punch_in, punch_out) - lunch
}

/// `max(0, (out - in) - lunch) / 60`, rounded to 2 decimals.
pub fn total_hours(punch_in: NaiveDateTime, punch_out: NaiveDateTime, lunch: i64) -> f64 {
    let mins = worked_minutes(punch_in, punch_out, lunch).max(0);
    round2(mins as f64 / 60.0)
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn validate_lunch(minutes: i64) -> AppResult<i64> {
    if (0..=MAX_LUNCH_MINUTES).contains(&minutes) {
        Ok(minutes)
    } else {
        Err(AppError::InvalidLunch(format!(
            "{minutes} min (expected 0..={MAX_LUNCH_MINUTES}, usual choices: {})",
            LUNCH_OPTIONS.map(|m| m.to_string()).join(", ")
        )))
    }
}

/// `"{h}h {mm}m"`, as shown next to open shifts.
pub fn format_elapsed(minutes: i64) -> String {
    let m = minutes.max(0);
    format!("{}h {:02}m", m / 60, m % 60)
}

/// Gross shift length as `"{h}h{mm}"`, used in the punch-out preview.
pub fn format_gross(minutes: i64) -> String {
    let m = minutes.max(0);
    format!("{}h{:02}", m / 60, m % 60)
}

pub fn sum_hours<'a, I>(entries: I) -> f64
where
    I: IntoIterator<Item = &'a PunchEntry>,
{
    round2(entries.into_iter().map(PunchEntry::hours).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn full_day_with_lunch() {
        assert_eq!(total_hours(at(7, 0), at(15, 30), 30), 8.0);
    }

    #[test]
    fn rounds_to_two_decimals() {
        // 7h20 = 7.333...
        assert_eq!(total_hours(at(8, 0), at(15, 20), 0), 7.33);
        // 10 minutes = 0.1666...
        assert_eq!(total_hours(at(8, 0), at(8, 10), 0), 0.17);
    }

    #[test]
    fn clamps_negative_durations() {
        assert_eq!(total_hours(at(8, 0), at(8, 20), 30), 0.0);
        assert_eq!(total_hours(at(9, 0), at(8, 0), 0), 0.0);
    }

    #[test]
    fn partial_minutes_are_truncated() {
        let start = at(8, 0);
        let end = start + chrono::Duration::seconds(59 * 60 + 59);
        assert_eq!(minutes_between(start, end), 59);
    }

    #[test]
    fn lunch_bounds() {
        assert!(validate_lunch(0).is_ok());
        assert!(validate_lunch(120).is_ok());
        assert!(validate_lunch(121).is_err());
        assert!(validate_lunch(-5).is_err());
    }

    #[test]
    fn elapsed_format() {
        assert_eq!(format_elapsed(125), "2h 05m");
        assert_eq!(format_elapsed(-3), "0h 00m");
        assert_eq!(format_gross(480), "8h00");
    }
}
