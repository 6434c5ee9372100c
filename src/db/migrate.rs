use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension};
use std::fs;
use std::path::Path;

/// One schema step. Applied versions are recorded in the `log` table
/// as `operation = 'migration_applied'`, `target = version`.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_core_schema",
        description: "Created companies, app_users, projects and punch_entries",
        sql: r#"
        CREATE TABLE IF NOT EXISTS companies (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            join_code   TEXT NOT NULL UNIQUE,
            logo_path   TEXT,
            address     TEXT,
            phone       TEXT,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS app_users (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            company_id         INTEGER NOT NULL REFERENCES companies(id),
            full_name          TEXT NOT NULL,
            pin_code           TEXT NOT NULL,
            role               TEXT NOT NULL,
            grp                TEXT NOT NULL DEFAULT '',
            assigned_projects  TEXT NOT NULL DEFAULT '[]',
            is_active          INTEGER NOT NULL DEFAULT 1,
            is_admin           INTEGER NOT NULL DEFAULT 0,
            allowed_pages      TEXT NOT NULL DEFAULT '[]',
            approves_users     TEXT NOT NULL DEFAULT '[]',
            phone              TEXT
        );

        CREATE TABLE IF NOT EXISTS projects (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            company_id      INTEGER NOT NULL REFERENCES companies(id),
            name            TEXT NOT NULL,
            project_number  TEXT NOT NULL,
            address         TEXT,
            assigned_users  TEXT NOT NULL DEFAULT '[]',
            is_active       INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS punch_entries (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            company_id    INTEGER NOT NULL REFERENCES companies(id),
            user_id       INTEGER NOT NULL,
            user_name     TEXT NOT NULL,
            project_id    INTEGER NOT NULL,
            project_name  TEXT NOT NULL,
            punch_in      TEXT NOT NULL,
            punch_out     TEXT,
            lunch_break   INTEGER NOT NULL DEFAULT 0,
            total_hours   REAL,
            status        TEXT NOT NULL DEFAULT 'active'
                          CHECK(status IN ('active','completed','approved','rejected')),
            work_date     TEXT NOT NULL,
            week_start    TEXT NOT NULL,
            grp           TEXT NOT NULL DEFAULT '',
            role          TEXT NOT NULL,
            machine       TEXT,
            plate_number  TEXT,
            approved_by   TEXT,
            approved_at   TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_users_company ON app_users(company_id, is_active);
        CREATE INDEX IF NOT EXISTS idx_projects_company ON projects(company_id, is_active);
        CREATE INDEX IF NOT EXISTS idx_entries_user ON punch_entries(user_id, status);
        CREATE INDEX IF NOT EXISTS idx_entries_week ON punch_entries(company_id, week_start);
        "#,
    },
    Migration {
        version: "20250315_0002_sms_codes",
        description: "Created sms_codes table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS sms_codes (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            phone       TEXT NOT NULL UNIQUE,
            code        TEXT NOT NULL,
            expires_at  TEXT NOT NULL,
            user_id     INTEGER NOT NULL,
            created_at  TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250402_0003_entry_edit_audit",
        description: "Added modified_by / modified_at to punch_entries",
        sql: r#"
        ALTER TABLE punch_entries ADD COLUMN modified_by TEXT;
        ALTER TABLE punch_entries ADD COLUMN modified_at TEXT;
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn table_exists(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Path of the main database file, empty for in-memory databases.
fn db_file_path(conn: &Connection) -> String {
    conn.query_row("PRAGMA database_list;", [], |row| row.get::<_, String>(2))
        .unwrap_or_default()
}

/// Copy the DB file next to itself before altering existing data.
fn backup_before_migration(db_path: &str) -> AppResult<()> {
    let src = Path::new(db_path);
    if !src.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let file_name = src
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "logipunch.sqlite".to_string());
    let backup_path = src.with_file_name(format!("{file_name}.{ts}.bak"));

    fs::copy(src, &backup_path)
        .map_err(|e| AppError::Migration(format!("pre-migration backup failed: {e}")))?;

    success(format!("📦 Backup created: {}", backup_path.display()));
    Ok(())
}

/// Versions not yet recorded in the `log` table.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
///
/// Called by DbPool::open() every time the database is opened.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    let pending = pending_migrations(conn)?;
    if pending.is_empty() {
        return Ok(());
    }

    // Existing data: take a safety copy first
    if table_exists(conn, "punch_entries")? {
        warning("Schema upgrade pending: creating a safety backup first");
        let path = db_file_path(conn);
        if path.is_empty() {
            warning("Could not determine the DB path, backup skipped.");
        } else {
            backup_before_migration(&path)?;
        }
    }

    for m in MIGRATIONS.iter().filter(|m| pending.contains(&m.version)) {
        conn.execute_batch(&format!("BEGIN;\n{}\nCOMMIT;", m.sql))
            .map_err(|e| {
                let _ = conn.execute_batch("ROLLBACK;");
                AppError::Migration(format!("{}: {}", m.version, e))
            })?;

        conn.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
            [m.version, m.description],
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        assert!(pending_migrations(&conn).unwrap().is_empty());

        run_pending_migrations(&conn).unwrap();
        let applied: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(applied as usize, MIGRATIONS.len());
    }
}
