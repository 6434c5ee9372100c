//! Unified application error type.
//! All modules (db, core, cli, export) return AppError so that the binary
//! can print one short message and exit.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Corrupted record: {0}")]
    Corrupted(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid date/time format: {0}")]
    InvalidDateTime(String),

    #[error("Invalid PIN: {0}")]
    InvalidPin(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("Invalid lunch break: {0}")]
    InvalidLunch(String),

    #[error("Invalid page name: {0}")]
    InvalidPage(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    // ---------------------------
    // Domain errors
    // ---------------------------
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Invalid code. Check it and try again.")]
    InvalidCode,

    #[error("No company selected: run `company join <CODE>` or pass --company")]
    NoCompany,

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Already punched in on {0}")]
    AlreadyPunchedIn(String),

    #[error("No open shift: punch in first")]
    NotPunchedIn,

    #[error("Entry #{id} is {status}: {action} not allowed")]
    InvalidTransition {
        id: i64,
        status: String,
        action: &'static str,
    },

    // ---------------------------
    // SMS
    // ---------------------------
    #[error("SMS error: {0}")]
    Sms(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        AppError::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
