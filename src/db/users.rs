use super::{conversion_error, json_list, to_json_list};
use crate::errors::{AppError, AppResult};
use crate::models::{AppUser, Page, Role};
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_row(row: &Row) -> rusqlite::Result<AppUser> {
    let pages: Vec<String> = json_list(row.get("allowed_pages")?)?;
    let allowed_pages = pages
        .iter()
        .map(|p| p.parse::<Page>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| conversion_error(0, e))?;

    Ok(AppUser {
        id: row.get("id")?,
        company_id: row.get("company_id")?,
        full_name: row.get("full_name")?,
        pin_code: row.get("pin_code")?,
        role: Role::parse(&row.get::<_, String>("role")?),
        group: row.get("grp")?,
        assigned_projects: json_list(row.get("assigned_projects")?)?,
        is_active: row.get::<_, i64>("is_active")? == 1,
        is_admin: row.get::<_, i64>("is_admin")? == 1,
        allowed_pages,
        approves_users: json_list(row.get("approves_users")?)?,
        phone: row.get("phone")?,
    })
}

fn pages_json(pages: &[Page]) -> String {
    let names: Vec<&str> = pages.iter().map(Page::as_str).collect();
    to_json_list(&names)
}

pub fn insert_user(conn: &Connection, u: &AppUser) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO app_users (company_id, full_name, pin_code, role, grp, assigned_projects,
                                is_active, is_admin, allowed_pages, approves_users, phone)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            u.company_id,
            u.full_name,
            u.pin_code,
            u.role.as_str(),
            u.group,
            to_json_list(&u.assigned_projects),
            u.is_active as i64,
            u.is_admin as i64,
            pages_json(&u.allowed_pages),
            to_json_list(&u.approves_users),
            u.phone,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_user(conn: &Connection, u: &AppUser) -> AppResult<()> {
    conn.execute(
        "UPDATE app_users SET full_name = ?1, pin_code = ?2, role = ?3, grp = ?4,
                assigned_projects = ?5, is_active = ?6, is_admin = ?7,
                allowed_pages = ?8, approves_users = ?9, phone = ?10
         WHERE id = ?11",
        params![
            u.full_name,
            u.pin_code,
            u.role.as_str(),
            u.group,
            to_json_list(&u.assigned_projects),
            u.is_active as i64,
            u.is_admin as i64,
            pages_json(&u.allowed_pages),
            to_json_list(&u.approves_users),
            u.phone,
            u.id,
        ],
    )?;
    Ok(())
}

pub fn load_user(conn: &Connection, company_id: i64, id: i64) -> AppResult<AppUser> {
    conn.query_row(
        "SELECT * FROM app_users WHERE id = ?1 AND company_id = ?2",
        params![id, company_id],
        map_row,
    )
    .optional()?
    .ok_or_else(|| AppError::not_found("User", id))
}

/// Any user, any company. Used once an SMS code has proven ownership.
pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Option<AppUser>> {
    let u = conn
        .query_row("SELECT * FROM app_users WHERE id = ?1", [id], map_row)
        .optional()?;
    Ok(u)
}

/// Active users of the company, sorted by name.
pub fn list_active(conn: &Connection, company_id: i64) -> AppResult<Vec<AppUser>> {
    list(conn, company_id, false)
}

pub fn list(conn: &Connection, company_id: i64, include_inactive: bool) -> AppResult<Vec<AppUser>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM app_users
         WHERE company_id = ?1 AND (is_active = 1 OR ?2 = 1)
         ORDER BY full_name COLLATE NOCASE ASC",
    )?;
    let rows = stmt.query_map(params![company_id, include_inactive as i64], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_active_by_pin(conn: &Connection, company_id: i64, pin: &str) -> AppResult<Option<AppUser>> {
    let u = conn
        .query_row(
            "SELECT * FROM app_users
             WHERE company_id = ?1 AND pin_code = ?2 AND is_active = 1
             LIMIT 1",
            params![company_id, pin],
            map_row,
        )
        .optional()?;
    Ok(u)
}

/// First active user with this phone, in `company_id` when given, else in any company.
pub fn find_active_by_phone(
    conn: &Connection,
    phone: &str,
    company_id: Option<i64>,
) -> AppResult<Option<AppUser>> {
    let u = conn
        .query_row(
            "SELECT * FROM app_users
             WHERE phone = ?1 AND is_active = 1 AND (?2 IS NULL OR company_id = ?2)
             ORDER BY id ASC LIMIT 1",
            params![phone, company_id],
            map_row,
        )
        .optional()?;
    Ok(u)
}

/// Soft delete: the user keeps its history but can no longer log in.
pub fn deactivate(conn: &Connection, id: i64) -> AppResult<()> {
    conn.execute("UPDATE app_users SET is_active = 0 WHERE id = ?1", [id])?;
    Ok(())
}
