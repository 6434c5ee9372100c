//! Phone number normalization for SMS codes.

use crate::errors::{AppError, AppResult};

/// Normalize to E.164.
///
/// Separators are dropped. Ten digits get the `+1` prefix, any other
/// length gets a bare `+`.
pub fn normalize(input: &str) -> AppResult<String> {
    let trimmed = input.trim();
    let has_plus = trimmed.starts_with('+');
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();

    let ok_chars = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '.' | '(' | ')'));
    if !ok_chars || digits.is_empty() {
        return Err(AppError::InvalidPhone(input.to_string()));
    }

    let normalized = if has_plus {
        format!("+{digits}")
    } else if digits.len() == 10 {
        format!("+1{digits}")
    } else {
        format!("+{digits}")
    };

    // E.164 allows at most 15 digits
    if !(9..=16).contains(&normalized.len()) {
        return Err(AppError::InvalidPhone(input.to_string()));
    }
    Ok(normalized)
}
