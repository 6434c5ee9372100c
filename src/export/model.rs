// src/export/model.rs

use crate::core::timesheet::{Timesheet, UserWeek};
use crate::utils::time::hm;
use serde::Serialize;
use std::collections::HashMap;

/// Column headers of each employee block.
pub const HEADERS: [&str; 8] = [
    "Date",
    "Projet",
    "No Projet",
    "Équipement/Plaque",
    "Arrivée",
    "Départ",
    "Dîner (min)",
    "Total (h)",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Title,
    Employee,
    Header,
    Entry,
    DayTotal,
    WeekTotal,
    Blank,
}

/// One line of the exported sheet. Every format renders the same sequence.
#[derive(Debug, Clone)]
pub struct SheetRow {
    pub kind: RowKind,
    pub cells: Vec<String>,
}

impl SheetRow {
    fn new(kind: RowKind, cells: Vec<String>) -> Self {
        Self { kind, cells }
    }

    /// Label in the lunch column, value in the total column.
    fn total(kind: RowKind, label: &str, hours: f64) -> Self {
        let mut cells = vec![String::new(); HEADERS.len()];
        cells[6] = label.to_string();
        cells[7] = format!("{hours:.2}");
        Self::new(kind, cells)
    }
}

pub fn title_lines(ts: &Timesheet, company: &str) -> Vec<String> {
    vec![
        format!("{company} - Feuille de temps"),
        format!("Groupe : {}", ts.group),
        format!(
            "Semaine du {} au {}",
            ts.week_start.format("%Y-%m-%d"),
            ts.week_end.format("%Y-%m-%d")
        ),
        format!("Total équipe : {:.2} h", ts.total),
    ]
}

fn employee_rows(u: &UserWeek, numbers: &HashMap<i64, String>, out: &mut Vec<SheetRow>) {
    out.push(SheetRow::new(
        RowKind::Employee,
        vec![u.user_name.clone(), format!("{:.2} h", u.total)],
    ));
    out.push(SheetRow::new(
        RowKind::Header,
        HEADERS.iter().map(|h| h.to_string()).collect(),
    ));

    for day in u.days.iter().filter(|d| d.count > 0) {
        let mut first = true;
        for e in u.entries.iter().filter(|e| e.work_date == day.date) {
            let date = if first {
                day.date.format("%Y-%m-%d").to_string()
            } else {
                String::new()
            };
            first = false;

            out.push(SheetRow::new(
                RowKind::Entry,
                vec![
                    date,
                    e.project_name.clone(),
                    numbers.get(&e.project_id).cloned().unwrap_or_default(),
                    e.equipment().unwrap_or("").to_string(),
                    hm(e.punch_in),
                    e.punch_out.map(hm).unwrap_or_default(),
                    e.lunch_break.to_string(),
                    format!("{:.2}", e.hours()),
                ],
            ));
        }
        out.push(SheetRow::total(RowKind::DayTotal, "Total jour", day.hours));
    }

    out.push(SheetRow::total(RowKind::WeekTotal, "Total semaine", u.total));
    out.push(SheetRow::new(RowKind::Blank, Vec::new()));
}

/// Title rows, then one block per employee with hours.
pub fn build_rows(ts: &Timesheet, company: &str, numbers: &HashMap<i64, String>) -> Vec<SheetRow> {
    let mut out: Vec<SheetRow> = title_lines(ts, company)
        .into_iter()
        .map(|t| SheetRow::new(RowKind::Title, vec![t]))
        .collect();
    out.push(SheetRow::new(RowKind::Blank, Vec::new()));

    for u in ts.users_with_hours() {
        employee_rows(u, numbers, &mut out);
    }
    out
}

/// Structured form written by the JSON export.
#[derive(Serialize, Debug)]
pub struct TimesheetDoc {
    pub company: String,
    pub group: String,
    pub week_start: String,
    pub week_end: String,
    pub total_hours: f64,
    pub day_totals: Vec<DayTotalDoc>,
    pub employees: Vec<EmployeeDoc>,
}

#[derive(Serialize, Debug)]
pub struct DayTotalDoc {
    pub date: String,
    pub hours: f64,
}

#[derive(Serialize, Debug)]
pub struct EmployeeDoc {
    pub name: String,
    pub group: String,
    pub total_hours: f64,
    pub entries: Vec<EntryDoc>,
}

#[derive(Serialize, Debug)]
pub struct EntryDoc {
    pub date: String,
    pub project: String,
    pub project_number: String,
    pub equipment: Option<String>,
    pub punch_in: String,
    pub punch_out: Option<String>,
    pub lunch_minutes: i64,
    pub total_hours: f64,
    pub status: String,
}

pub fn build_doc(ts: &Timesheet, company: &str, numbers: &HashMap<i64, String>) -> TimesheetDoc {
    TimesheetDoc {
        company: company.to_string(),
        group: ts.group.clone(),
        week_start: ts.week_start.format("%Y-%m-%d").to_string(),
        week_end: ts.week_end.format("%Y-%m-%d").to_string(),
        total_hours: ts.total,
        day_totals: ts
            .days
            .iter()
            .zip(&ts.day_totals)
            .map(|(d, h)| DayTotalDoc {
                date: d.format("%Y-%m-%d").to_string(),
                hours: *h,
            })
            .collect(),
        employees: ts
            .users_with_hours()
            .map(|u| EmployeeDoc {
                name: u.user_name.clone(),
                group: u.group.clone(),
                total_hours: u.total,
                entries: u
                    .entries
                    .iter()
                    .map(|e| EntryDoc {
                        date: e.work_date.format("%Y-%m-%d").to_string(),
                        project: e.project_name.clone(),
                        project_number: numbers.get(&e.project_id).cloned().unwrap_or_default(),
                        equipment: e.equipment().map(str::to_string),
                        punch_in: hm(e.punch_in),
                        punch_out: e.punch_out.map(hm),
                        lunch_minutes: e.lunch_break,
                        total_hours: e.hours(),
                        status: e.status.to_string(),
                    })
                    .collect(),
            })
            .collect(),
    }
}
