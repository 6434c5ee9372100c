//! Shift lifecycle: punch in, punch out, project switch, and the views built on it.

use crate::config::Config;
use crate::core::hours::{self, validate_lunch};
use crate::db::log::ttlog;
use crate::db::{entries, projects};
use crate::errors::{AppError, AppResult};
use crate::models::{AppUser, EntryStatus, Project, PunchEntry, Role};
use crate::utils::date::{week_days, week_end, week_start};
use crate::utils::time::hm;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use std::collections::BTreeMap;

pub struct PunchLogic;

/// Projects currently staffed, with their open shifts.
pub struct ActiveGroup {
    pub project_name: String,
    pub entries: Vec<PunchEntry>,
}

pub struct DayHours {
    pub date: NaiveDate,
    pub entries: Vec<PunchEntry>,
    pub total: f64,
}

pub struct WeekView {
    pub week_start: NaiveDate,
    pub days: Vec<DayHours>,
    pub total: f64,
}

fn clean(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Close `entry` in place. With `auto_approve`, admin roles skip the approval queue.
/// A punch-out before the punch-in counts as 0 h.
fn close_entry(entry: &mut PunchEntry, user: &AppUser, lunch: i64, at: NaiveDateTime, auto_approve: bool) {
    entry.punch_out = Some(at);
    entry.lunch_break = lunch;
    entry.total_hours = Some(hours::total_hours(entry.punch_in, at, lunch));

    if auto_approve && user.role.is_admin() {
        entry.status = EntryStatus::Approved;
        entry.approved_by = Some(user.full_name.clone());
        entry.approved_at = Some(at);
    } else {
        entry.status = EntryStatus::Completed;
    }
}

impl PunchLogic {
    /// Active projects the user may punch on.
    pub fn available_projects(conn: &Connection, cfg: &Config, user: &AppUser) -> AppResult<Vec<Project>> {
        let all = projects::list_active(conn, user.company_id)?;

        if user.role == Role::Mecano {
            return Ok(all
                .into_iter()
                .filter(|p| {
                    p.name == cfg.mechanic_project_name
                        || p.project_number == cfg.mechanic_project_number
                })
                .collect());
        }

        if user.assigned_projects.is_empty() {
            Ok(all)
        } else {
            Ok(all
                .into_iter()
                .filter(|p| user.assigned_projects.contains(&p.id))
                .collect())
        }
    }

    fn pick_project(conn: &Connection, cfg: &Config, user: &AppUser, project_id: i64) -> AppResult<Project> {
        Self::available_projects(conn, cfg, user)?
            .into_iter()
            .find(|p| p.id == project_id)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "project #{project_id} is not available to {}",
                    user.full_name
                ))
            })
    }

    fn new_entry(
        cfg: &Config,
        user: &AppUser,
        project: &Project,
        machine: Option<String>,
        plate: Option<String>,
        at: NaiveDateTime,
    ) -> AppResult<PunchEntry> {
        if user.role.needs_machine() && machine.is_none() {
            return Err(AppError::Validation(format!(
                "a machine is required for {}",
                user.role
            )));
        }
        if user.role.needs_plate() && plate.is_none() {
            return Err(AppError::Validation(format!(
                "a plate number is required for {}",
                user.role
            )));
        }

        let work_date = at.date();
        Ok(PunchEntry {
            id: 0,
            company_id: user.company_id,
            user_id: user.id,
            user_name: user.full_name.clone(),
            project_id: project.id,
            project_name: project.name.clone(),
            punch_in: at,
            punch_out: None,
            lunch_break: 0,
            total_hours: None,
            status: EntryStatus::Active,
            work_date,
            week_start: week_start(work_date, cfg.week_starts_on),
            group: user.group.clone(),
            role: user.role.clone(),
            machine,
            plate_number: plate,
            approved_by: None,
            approved_at: None,
            modified_by: None,
            modified_at: None,
        })
    }

    pub fn punch_in(
        conn: &Connection,
        cfg: &Config,
        user: &AppUser,
        project_id: i64,
        machine: Option<&str>,
        plate: Option<&str>,
        at: NaiveDateTime,
    ) -> AppResult<PunchEntry> {
        if let Some(open) = entries::find_open_for_user(conn, user.id)? {
            return Err(AppError::AlreadyPunchedIn(format!(
                "{} since {}",
                open.project_name,
                hm(open.punch_in)
            )));
        }

        let project = Self::pick_project(conn, cfg, user, project_id)?;
        let plate = clean(plate).map(|p| p.to_uppercase());
        let mut entry = Self::new_entry(cfg, user, &project, clean(machine), plate, at)?;

        entry.id = entries::insert_entry(conn, &entry)?;

        ttlog(
            conn,
            "punch_in",
            &format!("entry {}", entry.id),
            &format!("{} on {} at {}", user.full_name, project.name, at),
        )?;

        Ok(entry)
    }

    pub fn punch_out(
        conn: &Connection,
        user: &AppUser,
        lunch: i64,
        at: NaiveDateTime,
    ) -> AppResult<PunchEntry> {
        let lunch = validate_lunch(lunch)?;
        let mut entry = entries::find_open_for_user(conn, user.id)?.ok_or(AppError::NotPunchedIn)?;

        close_entry(&mut entry, user, lunch, at, true);
        entries::update_entry(conn, &entry)?;

        ttlog(
            conn,
            "punch_out",
            &format!("entry {}", entry.id),
            &format!(
                "{} out at {} ({} h, lunch {} min, {})",
                user.full_name,
                at,
                entry.hours(),
                lunch,
                entry.status
            ),
        )?;

        Ok(entry)
    }

    /// Close the open shift with no lunch, as `completed`, and reopen it on another project.
    pub fn change_project(
        conn: &mut Connection,
        cfg: &Config,
        user: &AppUser,
        project_id: i64,
        machine: Option<&str>,
        at: NaiveDateTime,
    ) -> AppResult<(PunchEntry, PunchEntry)> {
        let mut current = entries::find_open_for_user(conn, user.id)?.ok_or(AppError::NotPunchedIn)?;

        if current.project_id == project_id {
            return Err(AppError::Validation(format!(
                "already punched in on {}",
                current.project_name
            )));
        }

        let project = Self::pick_project(conn, cfg, user, project_id)?;

        let machine = clean(machine).or_else(|| {
            if user.role.needs_machine() {
                current.machine.clone()
            } else {
                None
            }
        });
        let mut next = Self::new_entry(cfg, user, &project, machine, current.plate_number.clone(), at)?;

        // the segment left behind always goes through approval
        close_entry(&mut current, user, 0, at, false);

        let tx = conn.transaction()?;
        entries::update_entry(&tx, &current)?;
        next.id = entries::insert_entry(&tx, &next)?;
        ttlog(
            &tx,
            "switch",
            &format!("entry {} -> {}", current.id, next.id),
            &format!(
                "{} moved from {} to {} at {}",
                user.full_name, current.project_name, next.project_name, at
            ),
        )?;
        tx.commit()?;

        Ok((current, next))
    }

    /// Open shifts of the company, grouped by project name.
    pub fn active_users(conn: &Connection, company_id: i64) -> AppResult<Vec<ActiveGroup>> {
        let mut groups: BTreeMap<String, Vec<PunchEntry>> = BTreeMap::new();
        for e in entries::list_open(conn, company_id)? {
            groups.entry(e.project_name.clone()).or_default().push(e);
        }

        Ok(groups
            .into_iter()
            .map(|(project_name, entries)| ActiveGroup {
                project_name,
                entries,
            })
            .collect())
    }

    /// The user's entries for one week, split per day.
    pub fn my_week(conn: &Connection, user: &AppUser, start: NaiveDate) -> AppResult<WeekView> {
        let all = entries::list_for_user(conn, user.id, start, week_end(start))?;

        let days: Vec<DayHours> = week_days(start)
            .into_iter()
            .map(|date| {
                let mut day: Vec<PunchEntry> =
                    all.iter().filter(|e| e.work_date == date).cloned().collect();
                day.sort_by_key(|e| e.punch_in);
                let total = hours::sum_hours(&day);
                DayHours {
                    date,
                    entries: day,
                    total,
                }
            })
            .collect();

        let total = hours::round2(days.iter().map(|d| d.total).sum());
        Ok(WeekView {
            week_start: start,
            days,
            total,
        })
    }

    /// Owners may delete their entries until they are approved.
    pub fn delete_own(conn: &Connection, user: &AppUser, entry_id: i64) -> AppResult<PunchEntry> {
        let entry = entries::load_entry(conn, user.company_id, entry_id)?;

        if entry.user_id != user.id {
            return Err(AppError::Unauthorized(format!(
                "entry #{entry_id} belongs to {}",
                entry.user_name
            )));
        }
        if entry.status == EntryStatus::Approved {
            return Err(AppError::InvalidTransition {
                id: entry_id,
                status: entry.status.to_string(),
                action: "delete",
            });
        }

        entries::delete_entry(conn, entry_id)?;
        ttlog(
            conn,
            "del",
            &format!("entry {entry_id}"),
            &format!("{} deleted {} on {}", user.full_name, entry.project_name, entry.work_date),
        )?;
        Ok(entry)
    }
}
