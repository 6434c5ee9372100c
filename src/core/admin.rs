//! User and project management, reserved to administrators.

use crate::core::session::{Session, validate_pin};
use crate::db::log::ttlog;
use crate::db::{projects, users};
use crate::errors::{AppError, AppResult};
use crate::models::{AppUser, Project, ProjectDraft, Role, UserDraft};
use crate::utils::phone;
use rusqlite::Connection;

pub struct AdminLogic;

fn required(value: Option<&String>, what: &str) -> AppResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{what} is required")))
}

fn normalize_phone(p: &str) -> AppResult<Option<String>> {
    if p.trim().is_empty() {
        Ok(None)
    } else {
        phone::normalize(p).map(Some)
    }
}

/// PINs identify users at login, so two active users cannot share one.
fn ensure_pin_free(conn: &Connection, company_id: i64, pin: &str, except: Option<i64>) -> AppResult<()> {
    if let Some(other) = users::find_active_by_pin(conn, company_id, pin)?
        && Some(other.id) != except
    {
        return Err(AppError::InvalidPin(format!(
            "already used by {}",
            other.full_name
        )));
    }
    Ok(())
}

/// Mirror a project's assignee list into each user's `assigned_projects`,
/// which is what project availability reads.
fn sync_assignees(conn: &Connection, project: &Project, before: &[i64]) -> AppResult<()> {
    for uid in before.iter().filter(|u| !project.assigned_users.contains(u)) {
        let mut user = users::load_user(conn, project.company_id, *uid)?;
        user.assigned_projects.retain(|p| *p != project.id);
        users::update_user(conn, &user)?;
    }
    for uid in project.assigned_users.iter().filter(|u| !before.contains(u)) {
        let mut user = users::load_user(conn, project.company_id, *uid)?;
        if !user.assigned_projects.contains(&project.id) {
            user.assigned_projects.push(project.id);
            users::update_user(conn, &user)?;
        }
    }
    Ok(())
}

fn ensure_users_exist(conn: &Connection, company_id: i64, ids: &[i64]) -> AppResult<()> {
    for uid in ids {
        users::load_user(conn, company_id, *uid)?;
    }
    Ok(())
}

impl AdminLogic {
    /// Validate and insert a user. No permission check: also used to bootstrap a company.
    pub fn insert_user(conn: &Connection, company_id: i64, d: &UserDraft) -> AppResult<AppUser> {
        let full_name = required(d.full_name.as_ref(), "name")?;
        let pin = required(d.pin_code.as_ref(), "PIN")?;
        validate_pin(&pin)?;
        ensure_pin_free(conn, company_id, &pin, None)?;

        let phone = match &d.phone {
            Some(p) => normalize_phone(p)?,
            None => None,
        };

        let mut user = AppUser {
            id: 0,
            company_id,
            full_name,
            pin_code: pin,
            role: d.role.clone().unwrap_or(Role::Manoeuvre),
            group: d.group.clone().unwrap_or_default().trim().to_string(),
            assigned_projects: d.assigned_projects.clone().unwrap_or_default(),
            is_active: true,
            is_admin: d.is_admin.unwrap_or(false),
            allowed_pages: d.allowed_pages.clone().unwrap_or_default(),
            approves_users: d.approves_users.clone().unwrap_or_default(),
            phone,
        };
        user.id = users::insert_user(conn, &user)?;
        Ok(user)
    }

    pub fn add_user(conn: &Connection, session: &Session, d: &UserDraft) -> AppResult<AppUser> {
        session.require_admin()?;
        let user = Self::insert_user(conn, session.company_id(), d)?;
        ttlog(
            conn,
            "user_add",
            &format!("user {}", user.id),
            &format!("{} ({}) added by {}", user.full_name, user.role, session.user.full_name),
        )?;
        Ok(user)
    }

    pub fn edit_user(conn: &Connection, session: &Session, id: i64, d: &UserDraft) -> AppResult<AppUser> {
        session.require_admin()?;
        let mut user = users::load_user(conn, session.company_id(), id)?;

        if d.full_name.is_some() {
            user.full_name = required(d.full_name.as_ref(), "name")?;
        }
        if let Some(pin) = &d.pin_code {
            validate_pin(pin)?;
            ensure_pin_free(conn, user.company_id, pin, Some(user.id))?;
            user.pin_code = pin.clone();
        }
        if let Some(role) = &d.role {
            user.role = role.clone();
        }
        if let Some(group) = &d.group {
            user.group = group.trim().to_string();
        }
        if let Some(p) = &d.assigned_projects {
            user.assigned_projects = p.clone();
        }
        if let Some(flag) = d.is_admin {
            user.is_admin = flag;
        }
        if let Some(pages) = &d.allowed_pages {
            user.allowed_pages = pages.clone();
        }
        if let Some(ids) = &d.approves_users {
            user.approves_users = ids.clone();
        }
        if let Some(p) = &d.phone {
            user.phone = normalize_phone(p)?;
        }

        users::update_user(conn, &user)?;
        ttlog(
            conn,
            "user_edit",
            &format!("user {}", user.id),
            &format!("{} edited by {}", user.full_name, session.user.full_name),
        )?;
        Ok(user)
    }

    /// Soft delete.
    pub fn remove_user(conn: &Connection, session: &Session, id: i64) -> AppResult<AppUser> {
        session.require_admin()?;
        if id == session.user.id {
            return Err(AppError::Validation("you cannot deactivate yourself".into()));
        }
        let mut user = users::load_user(conn, session.company_id(), id)?;
        users::deactivate(conn, id)?;
        user.is_active = false;

        ttlog(
            conn,
            "user_remove",
            &format!("user {id}"),
            &format!("{} deactivated by {}", user.full_name, session.user.full_name),
        )?;
        Ok(user)
    }

    pub fn list_users(conn: &Connection, session: &Session) -> AppResult<Vec<AppUser>> {
        session.require_admin()?;
        users::list_active(conn, session.company_id())
    }

    pub fn add_project(conn: &Connection, session: &Session, d: &ProjectDraft) -> AppResult<Project> {
        session.require_admin()?;

        let mut project = Project {
            id: 0,
            company_id: session.company_id(),
            name: required(d.name.as_ref(), "project name")?,
            project_number: required(d.project_number.as_ref(), "project number")?,
            address: d.address.clone().filter(|a| !a.trim().is_empty()),
            assigned_users: d.assigned_users.clone().unwrap_or_default(),
            is_active: true,
        };
        ensure_users_exist(conn, project.company_id, &project.assigned_users)?;
        project.id = projects::insert_project(conn, &project)?;
        sync_assignees(conn, &project, &[])?;

        ttlog(
            conn,
            "project_add",
            &format!("project {}", project.id),
            &format!("{} ({}) added by {}", project.name, project.project_number, session.user.full_name),
        )?;
        Ok(project)
    }

    pub fn edit_project(conn: &Connection, session: &Session, id: i64, d: &ProjectDraft) -> AppResult<Project> {
        session.require_admin()?;
        let mut project = projects::load_project(conn, session.company_id(), id)?;
        let before = project.assigned_users.clone();

        if d.name.is_some() {
            project.name = required(d.name.as_ref(), "project name")?;
        }
        if d.project_number.is_some() {
            project.project_number = required(d.project_number.as_ref(), "project number")?;
        }
        if let Some(addr) = &d.address {
            project.address = Some(addr.clone()).filter(|a| !a.trim().is_empty());
        }
        if let Some(ids) = &d.assigned_users {
            ensure_users_exist(conn, project.company_id, ids)?;
            project.assigned_users = ids.clone();
        }

        projects::update_project(conn, &project)?;
        sync_assignees(conn, &project, &before)?;
        ttlog(
            conn,
            "project_edit",
            &format!("project {id}"),
            &format!("{} edited by {}", project.name, session.user.full_name),
        )?;
        Ok(project)
    }

    /// Add the user to the project's assignees, or remove them. Returns the new state.
    /// The user's own project list follows.
    pub fn toggle_assignment(
        conn: &Connection,
        session: &Session,
        project_id: i64,
        user_id: i64,
    ) -> AppResult<bool> {
        session.require_admin()?;
        let mut project = projects::load_project(conn, session.company_id(), project_id)?;
        let mut user = users::load_user(conn, session.company_id(), user_id)?;

        let assigned = if let Some(pos) = project.assigned_users.iter().position(|u| *u == user_id) {
            project.assigned_users.remove(pos);
            user.assigned_projects.retain(|p| *p != project_id);
            false
        } else {
            project.assigned_users.push(user_id);
            if !user.assigned_projects.contains(&project_id) {
                user.assigned_projects.push(project_id);
            }
            true
        };

        projects::update_project(conn, &project)?;
        users::update_user(conn, &user)?;
        ttlog(
            conn,
            "project_assign",
            &format!("project {project_id}"),
            &format!(
                "{} {} {}",
                user.full_name,
                if assigned { "assigned to" } else { "removed from" },
                project.name
            ),
        )?;
        Ok(assigned)
    }

    pub fn remove_project(conn: &Connection, session: &Session, id: i64) -> AppResult<Project> {
        session.require_admin()?;
        let mut project = projects::load_project(conn, session.company_id(), id)?;
        projects::deactivate(conn, id)?;
        project.is_active = false;

        ttlog(
            conn,
            "project_remove",
            &format!("project {id}"),
            &format!("{} deactivated by {}", project.name, session.user.full_name),
        )?;
        Ok(project)
    }

    pub fn list_projects(conn: &Connection, session: &Session) -> AppResult<Vec<Project>> {
        session.require_admin()?;
        projects::list_active(conn, session.company_id())
    }
}
