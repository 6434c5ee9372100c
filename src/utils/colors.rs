/// ANSI color helper utilities for terminal output.
use crate::models::EntryStatus;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";

pub fn color_for_status(status: EntryStatus) -> &'static str {
    match status {
        EntryStatus::Active => BLUE,
        EntryStatus::Completed => YELLOW,
        EntryStatus::Approved => GREEN,
        EntryStatus::Rejected => RED,
    }
}

/// Status label wrapped in its color.
pub fn colorize_status(status: EntryStatus) -> String {
    format!("{}{}{}", color_for_status(status), status.label(), RESET)
}

/// Grey placeholder for missing values.
pub fn colorize_optional(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => format!("{GREY}--{RESET}"),
    }
}
