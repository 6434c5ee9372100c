use super::{json_list, to_json_list};
use crate::errors::{AppError, AppResult};
use crate::models::Project;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_row(row: &Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get("id")?,
        company_id: row.get("company_id")?,
        name: row.get("name")?,
        project_number: row.get("project_number")?,
        address: row.get("address")?,
        assigned_users: json_list(row.get("assigned_users")?)?,
        is_active: row.get::<_, i64>("is_active")? == 1,
    })
}

pub fn insert_project(conn: &Connection, p: &Project) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO projects (company_id, name, project_number, address, assigned_users, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            p.company_id,
            p.name,
            p.project_number,
            p.address,
            to_json_list(&p.assigned_users),
            p.is_active as i64,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_project(conn: &Connection, p: &Project) -> AppResult<()> {
    conn.execute(
        "UPDATE projects SET name = ?1, project_number = ?2, address = ?3,
                assigned_users = ?4, is_active = ?5
         WHERE id = ?6",
        params![
            p.name,
            p.project_number,
            p.address,
            to_json_list(&p.assigned_users),
            p.is_active as i64,
            p.id,
        ],
    )?;
    Ok(())
}

pub fn load_project(conn: &Connection, company_id: i64, id: i64) -> AppResult<Project> {
    conn.query_row(
        "SELECT * FROM projects WHERE id = ?1 AND company_id = ?2",
        params![id, company_id],
        map_row,
    )
    .optional()?
    .ok_or_else(|| AppError::not_found("Project", id))
}

/// Active projects sorted by name.
pub fn list_active(conn: &Connection, company_id: i64) -> AppResult<Vec<Project>> {
    list(conn, company_id, false)
}

pub fn list(conn: &Connection, company_id: i64, include_inactive: bool) -> AppResult<Vec<Project>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM projects
         WHERE company_id = ?1 AND (is_active = 1 OR ?2 = 1)
         ORDER BY name COLLATE NOCASE ASC",
    )?;
    let rows = stmt.query_map(params![company_id, include_inactive as i64], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn deactivate(conn: &Connection, id: i64) -> AppResult<()> {
    conn.execute("UPDATE projects SET is_active = 0 WHERE id = ?1", [id])?;
    Ok(())
}
