use super::conversion_error;
use crate::errors::{AppError, AppResult};
use crate::models::{EntryStatus, PunchEntry, Role};
use crate::utils::time::{from_db, to_db};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn dt_col(row: &Row, col: &str) -> rusqlite::Result<NaiveDateTime> {
    let s: String = row.get(col)?;
    from_db(&s).map_err(|e| conversion_error(0, e))
}

fn opt_dt_col(row: &Row, col: &str) -> rusqlite::Result<Option<NaiveDateTime>> {
    match row.get::<_, Option<String>>(col)? {
        Some(s) => from_db(&s).map(Some).map_err(|e| conversion_error(0, e)),
        None => Ok(None),
    }
}

fn date_col(row: &Row, col: &str) -> rusqlite::Result<NaiveDate> {
    let s: String = row.get(col)?;
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .map_err(|_| conversion_error(0, AppError::InvalidDate(s.clone())))
}

pub fn map_row(row: &Row) -> rusqlite::Result<PunchEntry> {
    let status_str: String = row.get("status")?;
    let status = EntryStatus::from_db_str(&status_str)
        .ok_or_else(|| conversion_error(0, AppError::InvalidStatus(status_str.clone())))?;

    Ok(PunchEntry {
        id: row.get("id")?,
        company_id: row.get("company_id")?,
        user_id: row.get("user_id")?,
        user_name: row.get("user_name")?,
        project_id: row.get("project_id")?,
        project_name: row.get("project_name")?,
        punch_in: dt_col(row, "punch_in")?,
        punch_out: opt_dt_col(row, "punch_out")?,
        lunch_break: row.get("lunch_break")?,
        total_hours: row.get("total_hours")?,
        status,
        work_date: date_col(row, "work_date")?,
        week_start: date_col(row, "week_start")?,
        group: row.get("grp")?,
        role: Role::parse(&row.get::<_, String>("role")?),
        machine: row.get("machine")?,
        plate_number: row.get("plate_number")?,
        approved_by: row.get("approved_by")?,
        approved_at: opt_dt_col(row, "approved_at")?,
        modified_by: row.get("modified_by")?,
        modified_at: opt_dt_col(row, "modified_at")?,
    })
}

fn date_str(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

fn collect(
    stmt: &mut rusqlite::Statement<'_>,
    params: impl rusqlite::Params,
) -> AppResult<Vec<PunchEntry>> {
    let rows = stmt.query_map(params, map_row)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_entry(conn: &Connection, e: &PunchEntry) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO punch_entries (company_id, user_id, user_name, project_id, project_name,
                punch_in, punch_out, lunch_break, total_hours, status, work_date, week_start,
                grp, role, machine, plate_number, approved_by, approved_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
        params![
            e.company_id,
            e.user_id,
            e.user_name,
            e.project_id,
            e.project_name,
            to_db(e.punch_in),
            e.punch_out.map(to_db),
            e.lunch_break,
            e.total_hours,
            e.status.to_db_str(),
            date_str(e.work_date),
            date_str(e.week_start),
            e.group,
            e.role.as_str(),
            e.machine,
            e.plate_number,
            e.approved_by,
            e.approved_at.map(to_db),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Persist every mutable column of an existing entry.
pub fn update_entry(conn: &Connection, e: &PunchEntry) -> AppResult<()> {
    conn.execute(
        "UPDATE punch_entries SET project_id = ?1, project_name = ?2, punch_in = ?3,
                punch_out = ?4, lunch_break = ?5, total_hours = ?6, status = ?7,
                work_date = ?8, week_start = ?9, machine = ?10, plate_number = ?11,
                approved_by = ?12, approved_at = ?13, modified_by = ?14, modified_at = ?15
         WHERE id = ?16",
        params![
            e.project_id,
            e.project_name,
            to_db(e.punch_in),
            e.punch_out.map(to_db),
            e.lunch_break,
            e.total_hours,
            e.status.to_db_str(),
            date_str(e.work_date),
            date_str(e.week_start),
            e.machine,
            e.plate_number,
            e.approved_by,
            e.approved_at.map(to_db),
            e.modified_by,
            e.modified_at.map(to_db),
            e.id,
        ],
    )?;
    Ok(())
}

pub fn load_entry(conn: &Connection, company_id: i64, id: i64) -> AppResult<PunchEntry> {
    conn.query_row(
        "SELECT * FROM punch_entries WHERE id = ?1 AND company_id = ?2",
        params![id, company_id],
        map_row,
    )
    .optional()?
    .ok_or_else(|| AppError::not_found("Entry", id))
}

/// The user's open shift, if any.
pub fn find_open_for_user(conn: &Connection, user_id: i64) -> AppResult<Option<PunchEntry>> {
    let e = conn
        .query_row(
            "SELECT * FROM punch_entries
             WHERE user_id = ?1 AND status = 'active'
             ORDER BY punch_in DESC LIMIT 1",
            [user_id],
            map_row,
        )
        .optional()?;
    Ok(e)
}

/// Entries of one user whose work date falls in `[from, to]`, newest first.
pub fn list_for_user(
    conn: &Connection,
    user_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<Vec<PunchEntry>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM punch_entries
         WHERE user_id = ?1 AND work_date BETWEEN ?2 AND ?3
         ORDER BY punch_in DESC",
    )?;
    collect(&mut stmt, params![user_id, date_str(from), date_str(to)])
}

/// Every entry of the company, newest first.
pub fn list_company(conn: &Connection, company_id: i64) -> AppResult<Vec<PunchEntry>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM punch_entries WHERE company_id = ?1 ORDER BY punch_in DESC",
    )?;
    collect(&mut stmt, [company_id])
}

/// Open shifts of the company, oldest punch first.
pub fn list_open(conn: &Connection, company_id: i64) -> AppResult<Vec<PunchEntry>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM punch_entries
         WHERE company_id = ?1 AND status = 'active'
         ORDER BY punch_in ASC",
    )?;
    collect(&mut stmt, [company_id])
}

/// Entries of the company in `[from, to]` with one of the given statuses.
pub fn list_range(
    conn: &Connection,
    company_id: i64,
    from: NaiveDate,
    to: NaiveDate,
    statuses: &[EntryStatus],
) -> AppResult<Vec<PunchEntry>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM punch_entries
         WHERE company_id = ?1 AND work_date BETWEEN ?2 AND ?3
         ORDER BY punch_in ASC",
    )?;
    let all = collect(&mut stmt, params![company_id, date_str(from), date_str(to)])?;
    Ok(all.into_iter().filter(|e| statuses.contains(&e.status)).collect())
}

pub fn delete_entry(conn: &Connection, id: i64) -> AppResult<()> {
    conn.execute("DELETE FROM punch_entries WHERE id = ?1", [id])?;
    Ok(())
}
