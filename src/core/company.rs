//! Tenant bootstrap: create a company with its first admin, join it by code.

use crate::config::Config;
use crate::core::admin::AdminLogic;
use crate::core::session::Session;
use crate::db::companies;
use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use crate::models::{AppUser, Company, Role, UserDraft};
use crate::utils::time::to_db;
use chrono::NaiveDateTime;
use rand::Rng;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

const JOIN_CODE_CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const JOIN_CODE_LEN: usize = 6;

pub fn generate_join_code() -> String {
    let mut rng = rand::rng();
    (0..JOIN_CODE_LEN)
        .map(|_| {
            let idx = rng.random_range(0..JOIN_CODE_CHARS.len());
            JOIN_CODE_CHARS.as_bytes()[idx] as char
        })
        .collect()
}

fn normalize_code(code: &str) -> AppResult<String> {
    let code = code.trim().to_uppercase();
    if code.len() == JOIN_CODE_LEN && code.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(code)
    } else {
        Err(AppError::Validation(format!(
            "join code must be {JOIN_CODE_LEN} letters or digits"
        )))
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewCompany {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo: Option<PathBuf>,
    /// Fixed join code instead of a random one.
    pub join_code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FirstAdmin {
    pub full_name: String,
    pub role: Role,
    pub group: String,
    pub pin: String,
    pub pin_confirm: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo: Option<PathBuf>,
}

pub struct CompanyLogic;

impl CompanyLogic {
    pub fn create(
        conn: &mut Connection,
        cfg: &Config,
        company: &NewCompany,
        admin: &FirstAdmin,
        now: NaiveDateTime,
    ) -> AppResult<(Company, AppUser)> {
        let name = company.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("company name is required".into()));
        }
        if admin.pin != admin.pin_confirm {
            return Err(AppError::InvalidPin("the two PINs do not match".into()));
        }

        let join_code = match &company.join_code {
            Some(c) => {
                let c = normalize_code(c)?;
                if companies::code_exists(conn, &c)? {
                    return Err(AppError::Validation(format!("join code {c} is already taken")));
                }
                c
            }
            None => loop {
                let c = generate_join_code();
                if !companies::code_exists(conn, &c)? {
                    break c;
                }
            },
        };

        let tx = conn.transaction()?;
        let id = companies::insert_company(
            &tx,
            name,
            &join_code,
            company.address.as_deref(),
            company.phone.as_deref(),
            &to_db(now),
        )?;

        let draft = UserDraft {
            full_name: Some(admin.full_name.clone()),
            pin_code: Some(admin.pin.clone()),
            role: Some(admin.role.clone()),
            group: Some(admin.group.clone()),
            is_admin: Some(true),
            phone: admin.phone.clone(),
            ..Default::default()
        };
        let user = AdminLogic::insert_user(&tx, id, &draft)?;

        ttlog(
            &tx,
            "company_create",
            &join_code,
            &format!("{name} created by {}", user.full_name),
        )?;
        tx.commit()?;

        let mut created = companies::load_company(conn, id)?;
        if let Some(logo) = &company.logo {
            created.logo_path = Some(store_logo(cfg, id, logo)?);
            companies::update_company(conn, &created)?;
        }

        Ok((created, user))
    }

    /// Case-insensitive lookup by join code.
    pub fn join(conn: &Connection, code: &str) -> AppResult<Company> {
        companies::find_by_code(conn, code)?.ok_or(AppError::InvalidCode)
    }

    pub fn update(
        conn: &Connection,
        cfg: &Config,
        session: &Session,
        changes: &CompanyUpdate,
    ) -> AppResult<Company> {
        session.require_admin()?;
        let mut company = companies::load_company(conn, session.company_id())?;

        if let Some(name) = &changes.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::Validation("company name is required".into()));
            }
            company.name = name.to_string();
        }
        if let Some(addr) = &changes.address {
            company.address = Some(addr.clone()).filter(|a| !a.trim().is_empty());
        }
        if let Some(phone) = &changes.phone {
            company.phone = Some(phone.clone()).filter(|p| !p.trim().is_empty());
        }
        if let Some(logo) = &changes.logo {
            company.logo_path = Some(store_logo(cfg, company.id, logo)?);
        }

        companies::update_company(conn, &company)?;
        ttlog(
            conn,
            "company_update",
            &company.join_code,
            &format!("updated by {}", session.user.full_name),
        )?;
        Ok(company)
    }
}

/// Copy a logo into the storage directory and return the stored path.
pub fn store_logo(cfg: &Config, company_id: i64, src: &Path) -> AppResult<String> {
    if !src.is_file() {
        return Err(AppError::not_found("Logo file", src.display()));
    }

    let ext = src
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| "png".to_string());

    let dir = cfg.storage_dir().join("logos");
    fs::create_dir_all(&dir)?;
    let dest = dir.join(format!("company_{company_id}.{ext}"));
    fs::copy(src, &dest)?;

    Ok(dest.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_codes_are_six_upper_alphanumerics() {
        for _ in 0..50 {
            let c = generate_join_code();
            assert_eq!(c.len(), JOIN_CODE_LEN);
            assert!(c.chars().all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit()));
        }
    }

    #[test]
    fn fixed_codes_are_normalized() {
        assert_eq!(normalize_code(" abc123 ").unwrap(), "ABC123");
        assert!(normalize_code("ABC-12").is_err());
        assert!(normalize_code("ABC12").is_err());
    }
}
