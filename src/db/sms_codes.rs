use crate::errors::AppResult;
use crate::utils::time::{from_db, to_db};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};

/// Pending one-time code for a phone number.
#[derive(Debug, Clone)]
pub struct SmsCode {
    pub phone: String,
    pub code: String,
    pub expires_at: NaiveDateTime,
    pub user_id: i64,
}

/// Store a new code, replacing any pending one for the same phone.
pub fn replace_code(
    conn: &Connection,
    code: &SmsCode,
    created_at: NaiveDateTime,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO sms_codes (phone, code, expires_at, user_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(phone) DO UPDATE SET
            code = excluded.code,
            expires_at = excluded.expires_at,
            user_id = excluded.user_id,
            created_at = excluded.created_at",
        params![
            code.phone,
            code.code,
            to_db(code.expires_at),
            code.user_id,
            to_db(created_at)
        ],
    )?;
    Ok(())
}

pub fn find_pending(conn: &Connection, phone: &str) -> AppResult<Option<SmsCode>> {
    let row = conn
        .query_row(
            "SELECT phone, code, expires_at, user_id FROM sms_codes WHERE phone = ?1",
            [phone],
            |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, i64>(3)?,
                ))
            },
        )
        .optional()?;

    match row {
        Some((phone, code, expires, user_id)) => Ok(Some(SmsCode {
            phone,
            code,
            expires_at: from_db(&expires)?,
            user_id,
        })),
        None => Ok(None),
    }
}

pub fn delete_code(conn: &Connection, phone: &str) -> AppResult<()> {
    conn.execute("DELETE FROM sms_codes WHERE phone = ?1", [phone])?;
    Ok(())
}

/// Drop codes that can no longer be redeemed.
pub fn purge_expired(conn: &Connection, now: NaiveDateTime) -> AppResult<usize> {
    let n = conn.execute("DELETE FROM sms_codes WHERE expires_at < ?1", [to_db(now)])?;
    Ok(n)
}
