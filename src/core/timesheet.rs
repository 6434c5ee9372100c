//! Weekly payroll view per group.

use crate::config::Config;
use crate::core::hours::{round2, sum_hours};
use crate::db::{entries, users};
use crate::errors::AppResult;
use crate::models::{AppUser, EntryStatus, PunchEntry};
use crate::utils::date::{week_days, week_end};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::BTreeSet;

/// Statuses counted in the timesheet.
pub const REPORTED: [EntryStatus; 2] = [EntryStatus::Approved, EntryStatus::Completed];

#[derive(Debug, Clone, Serialize)]
pub struct DayStat {
    pub date: NaiveDate,
    pub hours: f64,
    pub first_in: Option<NaiveDateTime>,
    pub last_out: Option<NaiveDateTime>,
    pub max_lunch: i64,
    pub count: usize,
}

impl DayStat {
    fn from_entries(date: NaiveDate, day: &[&PunchEntry]) -> Self {
        Self {
            date,
            hours: sum_hours(day.iter().copied()),
            first_in: day.iter().map(|e| e.punch_in).min(),
            last_out: day.iter().filter_map(|e| e.punch_out).max(),
            max_lunch: day.iter().map(|e| e.lunch_break).max().unwrap_or(0),
            count: day.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserWeek {
    pub user_id: i64,
    pub user_name: String,
    pub group: String,
    pub days: Vec<DayStat>,
    pub total: f64,
    /// Chronological.
    pub entries: Vec<PunchEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Timesheet {
    pub group: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub days: Vec<NaiveDate>,
    /// Sorted by week total, highest first.
    pub users: Vec<UserWeek>,
    pub day_totals: Vec<f64>,
    pub total: f64,
}

impl Timesheet {
    pub fn users_with_hours(&self) -> impl Iterator<Item = &UserWeek> {
        self.users.iter().filter(|u| !u.entries.is_empty())
    }
}

/// Users listed under `group`: its own members plus the shared group's.
pub fn members<'a>(all: &'a [AppUser], group: &str, shared: Option<&str>) -> Vec<&'a AppUser> {
    all.iter()
        .filter(|u| u.group == group || shared.is_some_and(|s| u.group == s))
        .collect()
}

/// Pure assembly of a timesheet from users and reportable entries.
pub fn assemble(
    group: &str,
    start: NaiveDate,
    people: &[&AppUser],
    week_entries: &[PunchEntry],
) -> Timesheet {
    let days = week_days(start);

    let mut users: Vec<UserWeek> = people
        .iter()
        .map(|u| {
            let mut mine: Vec<PunchEntry> = week_entries
                .iter()
                .filter(|e| e.user_id == u.id && REPORTED.contains(&e.status))
                .cloned()
                .collect();
            mine.sort_by_key(|e| e.punch_in);

            let stats: Vec<DayStat> = days
                .iter()
                .map(|d| {
                    let day: Vec<&PunchEntry> = mine.iter().filter(|e| e.work_date == *d).collect();
                    DayStat::from_entries(*d, &day)
                })
                .collect();

            UserWeek {
                user_id: u.id,
                user_name: u.full_name.clone(),
                group: u.group.clone(),
                total: round2(stats.iter().map(|s| s.hours).sum()),
                days: stats,
                entries: mine,
            }
        })
        .collect();

    users.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.user_name.to_lowercase().cmp(&b.user_name.to_lowercase()))
    });

    let day_totals: Vec<f64> = (0..days.len())
        .map(|i| round2(users.iter().map(|u| u.days[i].hours).sum()))
        .collect();
    let total = round2(day_totals.iter().sum());

    Timesheet {
        group: group.to_string(),
        week_start: start,
        week_end: week_end(start),
        days,
        users,
        day_totals,
        total,
    }
}

pub struct TimesheetLogic;

impl TimesheetLogic {
    /// Distinct groups of the company's active users.
    pub fn groups(conn: &Connection, company_id: i64) -> AppResult<Vec<String>> {
        let set: BTreeSet<String> = users::list_active(conn, company_id)?
            .into_iter()
            .map(|u| u.group)
            .filter(|g| !g.is_empty())
            .collect();
        Ok(set.into_iter().collect())
    }

    pub fn build(
        conn: &Connection,
        cfg: &Config,
        company_id: i64,
        group: &str,
        start: NaiveDate,
    ) -> AppResult<Timesheet> {
        let all_users = users::list_active(conn, company_id)?;
        let shared = cfg.shared_group.as_deref();
        let people = members(&all_users, group, shared);

        let week = entries::list_range(conn, company_id, start, week_end(start), &REPORTED)?;
        Ok(assemble(group, start, &people, &week))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn user(id: i64, name: &str, group: &str) -> AppUser {
        AppUser {
            id,
            company_id: 1,
            full_name: name.into(),
            pin_code: "0000".into(),
            role: Role::Manoeuvre,
            group: group.into(),
            assigned_projects: vec![],
            is_active: true,
            is_admin: false,
            allowed_pages: vec![],
            approves_users: vec![],
            phone: None,
        }
    }

    fn entry(user_id: i64, day: u32, from: u32, to: u32, lunch: i64, status: EntryStatus) -> PunchEntry {
        let date = NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        let pin = date.and_hms_opt(from, 0, 0).unwrap();
        let pout = date.and_hms_opt(to, 0, 0).unwrap();
        PunchEntry {
            id: 0,
            company_id: 1,
            user_id,
            user_name: format!("u{user_id}"),
            project_id: 1,
            project_name: "Chantier".into(),
            punch_in: pin,
            punch_out: Some(pout),
            lunch_break: lunch,
            total_hours: Some(crate::core::hours::total_hours(pin, pout, lunch)),
            status,
            work_date: date,
            week_start: NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
            group: String::new(),
            role: Role::Manoeuvre,
            machine: None,
            plate_number: None,
            approved_by: None,
            approved_at: None,
            modified_by: None,
            modified_at: None,
        }
    }

    #[test]
    fn shared_group_is_added_to_every_group() {
        let all = vec![
            user(1, "Alice", "Groupe A"),
            user(2, "Bruno", "Groupe B"),
            user(3, "Chloé", "Groupe DDL"),
        ];

        let a: Vec<i64> = members(&all, "Groupe A", Some("Groupe DDL")).iter().map(|u| u.id).collect();
        assert_eq!(a, vec![1, 3]);

        let ddl: Vec<i64> = members(&all, "Groupe DDL", Some("Groupe DDL")).iter().map(|u| u.id).collect();
        assert_eq!(ddl, vec![3]);
    }

    #[test]
    fn totals_and_ordering() {
        let all = vec![user(1, "Alice", "A"), user(2, "Bruno", "A")];
        let people: Vec<&AppUser> = all.iter().collect();
        let start = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();

        let week = vec![
            entry(1, 10, 7, 15, 30, EntryStatus::Approved),  // 7.5
            entry(2, 10, 7, 16, 0, EntryStatus::Completed),  // 9
            entry(2, 11, 7, 12, 0, EntryStatus::Completed),  // 5
            entry(1, 11, 7, 17, 0, EntryStatus::Rejected),   // ignored
        ];

        let ts = assemble("A", start, &people, &week);
        assert_eq!(ts.users[0].user_name, "Bruno");
        assert_eq!(ts.users[0].total, 14.0);
        assert_eq!(ts.users[1].total, 7.5);
        assert_eq!(ts.day_totals[1], 16.5);
        assert_eq!(ts.total, 21.5);

        let monday = &ts.users[1].days[1];
        assert_eq!(monday.count, 1);
        assert_eq!(monday.max_lunch, 30);
        assert_eq!(monday.first_in.unwrap().format("%H:%M").to_string(), "07:00");
    }
}
