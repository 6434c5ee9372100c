pub mod active;
pub mod approvals;
pub mod backup;
pub mod company;
pub mod config;
pub mod db;
pub mod hours;
pub mod init;
pub mod log;
pub mod login;
pub mod project;
pub mod punch;
pub mod sms;
pub mod timesheet;
pub mod user;

use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::session::Session;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};

/// Open the store and authenticate `--pin` in the selected company.
pub(crate) fn open_session(cli: &Cli, cfg: &Config) -> AppResult<(DbPool, Session)> {
    let pin = cli
        .pin
        .as_deref()
        .ok_or_else(|| AppError::Validation("--pin is required for this command".into()))?;

    let pool = DbPool::open(&cfg.database)?;
    let session = Session::open(&pool.conn, cfg, cli.company.as_deref(), pin)?;
    Ok((pool, session))
}
