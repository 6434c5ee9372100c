//! Approval routing: which entries an approver sees, and what they may do with them.

use crate::config::Config;
use crate::core::hours::{self, validate_lunch};
use crate::db::log::ttlog;
use crate::db::{entries, projects, users};
use crate::errors::{AppError, AppResult};
use crate::models::{AppUser, EntryStatus, PunchEntry, Role};
use crate::utils::date::week_start;
use chrono::NaiveDateTime;
use rusqlite::Connection;
use std::collections::{BTreeMap, HashMap};

/// What an approver is allowed to see.
#[derive(Debug, Clone, PartialEq)]
pub enum Scope {
    Everyone,
    /// Entries of users holding one of these roles.
    Roles(Vec<Role>),
    /// Entries punched on the project with this name.
    Project(String),
    /// Entries of these users.
    Users(Vec<i64>),
}

/// Static role → scope table. `None` means the user approves nothing.
pub fn scope_for(approver: &AppUser, cfg: &Config) -> Option<Scope> {
    if approver.role.is_admin() {
        return Some(Scope::Everyone);
    }
    match approver.role {
        Role::GestionnaireChauffeur => Some(Scope::Roles(vec![Role::Chauffeur])),
        Role::GestionnaireCour => Some(Scope::Project(cfg.yard_project_name.clone())),
        Role::GestionnaireMecanique => Some(Scope::Roles(vec![Role::Mecano])),
        Role::Contremaitre => Some(Scope::Roles(vec![Role::Manoeuvre, Role::Operateur])),
        _ if !approver.approves_users.is_empty() => {
            Some(Scope::Users(approver.approves_users.clone()))
        }
        _ => None,
    }
}

impl Scope {
    /// `role_of` gives the current role of an entry's owner.
    pub fn covers(&self, entry: &PunchEntry, role_of: &HashMap<i64, Role>) -> bool {
        match self {
            Scope::Everyone => true,
            Scope::Roles(roles) => {
                let role = role_of.get(&entry.user_id).unwrap_or(&entry.role);
                roles.contains(role)
            }
            Scope::Project(name) => &entry.project_name == name,
            Scope::Users(ids) => ids.contains(&entry.user_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Pending,
    All,
}

/// Entries of one user as shown to an approver.
#[derive(Debug)]
pub struct UserEntries {
    pub user_id: i64,
    pub user_name: String,
    pub pending: usize,
    pub entries: Vec<PunchEntry>,
}

/// Fields an approver may rewrite.
#[derive(Debug, Clone, Default)]
pub struct EntryEdit {
    pub punch_in: Option<NaiveDateTime>,
    pub punch_out: Option<NaiveDateTime>,
    pub lunch: Option<i64>,
    pub project_id: Option<i64>,
}

pub struct ApprovalLogic;

impl ApprovalLogic {
    fn scope(approver: &AppUser, cfg: &Config) -> AppResult<Scope> {
        scope_for(approver, cfg).ok_or_else(|| {
            AppError::Unauthorized(format!("{} ({}) approves no one", approver.full_name, approver.role))
        })
    }

    fn roles_by_user(conn: &Connection, company_id: i64) -> AppResult<HashMap<i64, Role>> {
        Ok(users::list(conn, company_id, true)?
            .into_iter()
            .map(|u| (u.id, u.role))
            .collect())
    }

    /// Visible entries, newest first.
    pub fn visible_entries(
        conn: &Connection,
        cfg: &Config,
        approver: &AppUser,
        filter: Filter,
    ) -> AppResult<Vec<PunchEntry>> {
        let scope = Self::scope(approver, cfg)?;
        let roles = Self::roles_by_user(conn, approver.company_id)?;

        Ok(entries::list_company(conn, approver.company_id)?
            .into_iter()
            .filter(|e| scope.covers(e, &roles))
            .filter(|e| filter == Filter::All || e.status == EntryStatus::Completed)
            .collect())
    }

    /// Visible entries grouped by user, users sorted by name.
    pub fn list(
        conn: &Connection,
        cfg: &Config,
        approver: &AppUser,
        filter: Filter,
    ) -> AppResult<Vec<UserEntries>> {
        let mut groups: BTreeMap<(String, i64), Vec<PunchEntry>> = BTreeMap::new();
        for e in Self::visible_entries(conn, cfg, approver, filter)? {
            groups
                .entry((e.user_name.to_lowercase(), e.user_id))
                .or_default()
                .push(e);
        }

        Ok(groups
            .into_values()
            .map(|entries| UserEntries {
                user_id: entries[0].user_id,
                user_name: entries[0].user_name.clone(),
                pending: entries
                    .iter()
                    .filter(|e| e.status == EntryStatus::Completed)
                    .count(),
                entries,
            })
            .collect())
    }

    /// Load an entry and check the approver can see it.
    fn load_visible(
        conn: &Connection,
        cfg: &Config,
        approver: &AppUser,
        entry_id: i64,
    ) -> AppResult<PunchEntry> {
        let scope = Self::scope(approver, cfg)?;
        let entry = entries::load_entry(conn, approver.company_id, entry_id)?;
        let roles = Self::roles_by_user(conn, approver.company_id)?;

        if !scope.covers(&entry, &roles) {
            return Err(AppError::Unauthorized(format!(
                "entry #{entry_id} is outside the scope of {}",
                approver.full_name
            )));
        }
        Ok(entry)
    }

    fn decide(
        conn: &Connection,
        cfg: &Config,
        approver: &AppUser,
        entry_id: i64,
        to: EntryStatus,
        now: NaiveDateTime,
    ) -> AppResult<PunchEntry> {
        let action = if to == EntryStatus::Approved {
            "approve"
        } else {
            "reject"
        };

        let mut entry = Self::load_visible(conn, cfg, approver, entry_id)?;
        if entry.status != EntryStatus::Completed {
            return Err(AppError::InvalidTransition {
                id: entry_id,
                status: entry.status.to_string(),
                action,
            });
        }

        entry.status = to;
        if to == EntryStatus::Approved {
            entry.approved_by = Some(approver.full_name.clone());
            entry.approved_at = Some(now);
        }
        entries::update_entry(conn, &entry)?;

        ttlog(
            conn,
            action,
            &format!("entry {entry_id}"),
            &format!(
                "{} {} {} h of {} on {}",
                approver.full_name,
                to,
                entry.hours(),
                entry.user_name,
                entry.work_date
            ),
        )?;
        Ok(entry)
    }

    pub fn approve(
        conn: &Connection,
        cfg: &Config,
        approver: &AppUser,
        entry_id: i64,
        now: NaiveDateTime,
    ) -> AppResult<PunchEntry> {
        Self::decide(conn, cfg, approver, entry_id, EntryStatus::Approved, now)
    }

    pub fn reject(
        conn: &Connection,
        cfg: &Config,
        approver: &AppUser,
        entry_id: i64,
        now: NaiveDateTime,
    ) -> AppResult<PunchEntry> {
        Self::decide(conn, cfg, approver, entry_id, EntryStatus::Rejected, now)
    }

    /// Rewrite times, lunch or project of any visible entry.
    pub fn edit(
        conn: &Connection,
        cfg: &Config,
        approver: &AppUser,
        entry_id: i64,
        edit: &EntryEdit,
        now: NaiveDateTime,
    ) -> AppResult<PunchEntry> {
        let mut entry = Self::load_visible(conn, cfg, approver, entry_id)?;

        if let Some(pin) = edit.punch_in {
            entry.punch_in = pin;
            entry.work_date = pin.date();
            entry.week_start = week_start(pin.date(), cfg.week_starts_on);
        }
        if let Some(pout) = edit.punch_out {
            entry.punch_out = Some(pout);
        }
        if let Some(lunch) = edit.lunch {
            entry.lunch_break = validate_lunch(lunch)?;
        }
        if let Some(pid) = edit.project_id {
            let project = projects::load_project(conn, approver.company_id, pid)?;
            entry.project_id = project.id;
            entry.project_name = project.name;
        }

        // out before in clamps to 0 h
        if let Some(pout) = entry.punch_out {
            entry.total_hours = Some(hours::total_hours(entry.punch_in, pout, entry.lunch_break));
            // an edited open shift becomes a submitted one
            if entry.status == EntryStatus::Active {
                entry.status = EntryStatus::Completed;
            }
        }

        entry.modified_by = Some(approver.full_name.clone());
        entry.modified_at = Some(now);
        entries::update_entry(conn, &entry)?;

        ttlog(
            conn,
            "edit",
            &format!("entry {entry_id}"),
            &format!(
                "{} edited {} on {}: {} h, lunch {} min",
                approver.full_name,
                entry.user_name,
                entry.work_date,
                entry.hours(),
                entry.lunch_break
            ),
        )?;
        Ok(entry)
    }
}
