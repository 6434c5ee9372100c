//! Request-scoped context: which company, and which user is acting.

use crate::config::Config;
use crate::db::{companies, users};
use crate::errors::{AppError, AppResult};
use crate::models::{AppUser, Company, Page};
use rusqlite::Connection;

pub const PIN_LEN: usize = 4;

/// Exactly four ASCII digits.
pub fn validate_pin(pin: &str) -> AppResult<()> {
    if pin.len() == PIN_LEN && pin.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AppError::InvalidPin("the PIN must be exactly 4 digits".into()))
    }
}

/// Company from `--company`, else the one remembered in the configuration.
pub fn resolve_company(conn: &Connection, cfg: &Config, code: Option<&str>) -> AppResult<Company> {
    let code = code
        .map(str::to_string)
        .or_else(|| cfg.company_code.clone())
        .ok_or(AppError::NoCompany)?;

    companies::find_by_code(conn, &code)?.ok_or(AppError::InvalidCode)
}

#[derive(Debug, Clone)]
pub struct Session {
    pub company: Company,
    pub user: AppUser,
}

impl Session {
    /// Resolve the company and authenticate the PIN against its active users.
    pub fn open(conn: &Connection, cfg: &Config, company: Option<&str>, pin: &str) -> AppResult<Self> {
        let company = resolve_company(conn, cfg, company)?;
        let user = login(conn, &company, pin)?;
        Ok(Self { company, user })
    }

    pub fn company_id(&self) -> i64 {
        self.company.id
    }

    pub fn require(&self, page: Page) -> AppResult<()> {
        if self.user.can_open(page) {
            Ok(())
        } else {
            Err(AppError::Unauthorized(format!(
                "{} has no access to '{}'",
                self.user.full_name,
                page.as_str()
            )))
        }
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if self.user.has_admin_access() {
            Ok(())
        } else {
            Err(AppError::Unauthorized(format!(
                "{} is not an administrator",
                self.user.full_name
            )))
        }
    }
}

/// Plain PIN comparison against the company's active users.
pub fn login(conn: &Connection, company: &Company, pin: &str) -> AppResult<AppUser> {
    validate_pin(pin)?;
    users::find_active_by_pin(conn, company.id, pin)?
        .ok_or_else(|| AppError::InvalidPin("incorrect PIN".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_format() {
        assert!(validate_pin("0420").is_ok());
        assert!(validate_pin("420").is_err());
        assert!(validate_pin("04200").is_err());
        assert!(validate_pin("04a0").is_err());
        assert!(validate_pin("٠١٢٣").is_err());
    }
}
