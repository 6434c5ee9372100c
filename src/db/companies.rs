use crate::errors::{AppError, AppResult};
use crate::models::Company;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_row(row: &Row) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get("id")?,
        name: row.get("name")?,
        join_code: row.get("join_code")?,
        logo_path: row.get("logo_path")?,
        address: row.get("address")?,
        phone: row.get("phone")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_company(
    conn: &Connection,
    name: &str,
    join_code: &str,
    address: Option<&str>,
    phone: Option<&str>,
    created_at: &str,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO companies (name, join_code, address, phone, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![name, join_code, address, phone, created_at],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_by_code(conn: &Connection, code: &str) -> AppResult<Option<Company>> {
    let c = conn
        .query_row(
            "SELECT * FROM companies WHERE join_code = ?1",
            [code.trim().to_uppercase()],
            map_row,
        )
        .optional()?;
    Ok(c)
}

pub fn load_company(conn: &Connection, id: i64) -> AppResult<Company> {
    conn.query_row("SELECT * FROM companies WHERE id = ?1", [id], map_row)
        .optional()?
        .ok_or_else(|| AppError::not_found("Company", id))
}

pub fn code_exists(conn: &Connection, code: &str) -> AppResult<bool> {
    Ok(find_by_code(conn, code)?.is_some())
}

pub fn update_company(conn: &Connection, c: &Company) -> AppResult<()> {
    conn.execute(
        "UPDATE companies SET name = ?1, logo_path = ?2, address = ?3, phone = ?4
         WHERE id = ?5",
        params![c.name, c.logo_path, c.address, c.phone, c.id],
    )?;
    Ok(())
}
