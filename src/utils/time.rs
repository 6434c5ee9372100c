//! Date-time parsing and formatting for punch timestamps.

use crate::errors::{AppError, AppResult};
use chrono::{NaiveDateTime, Timelike};

/// Storage format of every timestamp column.
pub const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

pub fn now() -> NaiveDateTime {
    let n = chrono::Local::now().naive_local();
    n.with_nanosecond(0).unwrap_or(n)
}

/// Accepts `YYYY-MM-DD HH:MM`, `YYYY-MM-DD HH:MM:SS` or the `T` separated forms.
pub fn parse_datetime(s: &str) -> AppResult<NaiveDateTime> {
    let s = s.trim();
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .ok_or_else(|| AppError::InvalidDateTime(s.to_string()))
}

/// `--at` override or the current local time.
pub fn at_or_now(at: Option<&String>) -> AppResult<NaiveDateTime> {
    match at {
        Some(s) => parse_datetime(s),
        None => Ok(now()),
    }
}

pub fn to_db(dt: NaiveDateTime) -> String {
    dt.format(DATETIME_FMT).to_string()
}

pub fn from_db(s: &str) -> AppResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT)
        .map_err(|_| AppError::InvalidDateTime(s.to_string()))
}

pub fn hm(dt: NaiveDateTime) -> String {
    dt.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_short_and_long_forms() {
        let a = parse_datetime("2025-03-10 07:00").unwrap();
        let b = parse_datetime("2025-03-10T07:00:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(to_db(a), "2025-03-10 07:00:00");
        assert_eq!(hm(a), "07:00");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_datetime("10/03/2025 7h").is_err());
    }
}
