pub mod companies;
pub mod entries;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod projects;
pub mod sms_codes;
pub mod stats;
pub mod users;

use crate::errors::AppError;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Wrap a decoding failure so it surfaces through `rusqlite::Result`.
pub(crate) fn conversion_error(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(err))
}

/// List columns are stored as JSON arrays in TEXT columns.
pub(crate) fn json_list<T: DeserializeOwned>(raw: Option<String>) -> rusqlite::Result<Vec<T>> {
    match raw {
        None => Ok(Vec::new()),
        Some(s) if s.trim().is_empty() => Ok(Vec::new()),
        Some(s) => serde_json::from_str(&s)
            .map_err(|e| conversion_error(0, AppError::Corrupted(format!("list column: {e}")))),
    }
}

pub(crate) fn to_json_list<T: Serialize>(items: &[T]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}
