//! One-time SMS codes used to recover a forgotten company code.

use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::sms_codes::{self, SmsCode};
use crate::db::users;
use crate::errors::{AppError, AppResult};
use crate::models::AppUser;
use crate::utils::phone;
use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

const TWILIO_API: &str = "https://api.twilio.com/2010-04-01/Accounts";

/// Outbound text message channel.
pub trait SmsSender {
    fn send(&self, to: &str, body: &str) -> AppResult<()>;
}

/// Twilio `Messages.json` REST endpoint.
pub struct TwilioSender {
    account_sid: String,
    auth_token: String,
    from: String,
    client: reqwest::blocking::Client,
}

impl TwilioSender {
    pub fn new(account_sid: String, auth_token: String, from: String) -> Self {
        Self {
            account_sid,
            auth_token,
            from,
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl SmsSender for TwilioSender {
    fn send(&self, to: &str, body: &str) -> AppResult<()> {
        let url = format!("{TWILIO_API}/{}/Messages.json", self.account_sid);
        let resp = self
            .client
            .post(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", self.from.as_str()), ("Body", body)])
            .send()?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = resp
            .json::<serde_json::Value>()
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| status.to_string());
        Err(AppError::Sms(format!("Twilio refused the message: {detail}")))
    }
}

/// Prints messages on stderr instead of sending them.
pub struct ConsoleSender;

impl SmsSender for ConsoleSender {
    fn send(&self, to: &str, body: &str) -> AppResult<()> {
        eprintln!("📱 SMS to {to}: {body}");
        Ok(())
    }
}

/// Twilio when credentials are configured, the console otherwise.
pub fn sender_from_config(cfg: &Config) -> Box<dyn SmsSender> {
    match cfg.twilio_credentials() {
        Some((sid, token, from)) => Box::new(TwilioSender::new(sid, token, from)),
        None => Box::new(ConsoleSender),
    }
}

pub fn generate_code() -> String {
    format!("{:06}", rand::rng().random_range(0..1_000_000))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsAction {
    Send,
    Verify,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmsRequest {
    /// Kept as text so unknown actions produce an error reply.
    pub action: String,
    pub phone: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub company_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SmsReply {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AppUser>,
}

impl SmsReply {
    fn ok(user: Option<AppUser>) -> Self {
        Self {
            success: true,
            error: None,
            user,
        }
    }

    fn failed(err: &AppError) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            user: None,
        }
    }
}

pub struct SmsLogic<'a> {
    pub conn: &'a Connection,
    pub sender: &'a dyn SmsSender,
    pub ttl_minutes: i64,
    pub template: String,
}

impl<'a> SmsLogic<'a> {
    pub fn new(conn: &'a Connection, cfg: &Config, sender: &'a dyn SmsSender) -> Self {
        Self {
            conn,
            sender,
            ttl_minutes: cfg.sms_code_ttl_minutes,
            template: cfg.sms_template.clone(),
        }
    }

    /// Request/reply entry point. Errors are folded into the reply.
    pub fn handle(&self, req: &SmsRequest, now: NaiveDateTime) -> SmsReply {
        let action = match req.action.trim().to_lowercase().as_str() {
            "send" => SmsAction::Send,
            "verify" => SmsAction::Verify,
            other => {
                return SmsReply::failed(&AppError::Sms(format!("invalid action '{other}'")));
            }
        };

        let result = match action {
            SmsAction::Send => self.send(&req.phone, req.company_id, now).map(|_| None),
            SmsAction::Verify => {
                let code = req.code.as_deref().unwrap_or("");
                self.verify(&req.phone, code, now).map(Some)
            }
        };

        match result {
            Ok(user) => SmsReply::ok(user),
            Err(e) => SmsReply::failed(&e),
        }
    }

    /// Generate, store and send a code for the active user owning `raw_phone`.
    pub fn send(&self, raw_phone: &str, company_id: Option<i64>, now: NaiveDateTime) -> AppResult<()> {
        let phone = phone::normalize(raw_phone)?;

        let user = users::find_active_by_phone(self.conn, &phone, company_id)?
            .ok_or_else(|| AppError::not_found("User", &phone))?;

        sms_codes::purge_expired(self.conn, now)?;

        let code = generate_code();
        sms_codes::replace_code(
            self.conn,
            &SmsCode {
                phone: phone.clone(),
                code: code.clone(),
                expires_at: now + Duration::minutes(self.ttl_minutes),
                user_id: user.id,
            },
            now,
        )?;

        self.sender.send(&phone, &self.template.replace("{code}", &code))?;

        ttlog(
            self.conn,
            "sms_send",
            &phone,
            &format!("code sent to {}", user.full_name),
        )?;
        Ok(())
    }

    /// Check a code. Success consumes it and returns its user.
    pub fn verify(&self, raw_phone: &str, code: &str, now: NaiveDateTime) -> AppResult<AppUser> {
        let phone = phone::normalize(raw_phone)?;

        let pending = sms_codes::find_pending(self.conn, &phone)?
            .ok_or_else(|| AppError::Sms("no pending code for this number".into()))?;

        if now > pending.expires_at {
            sms_codes::delete_code(self.conn, &phone)?;
            return Err(AppError::Sms("code expired, request a new one".into()));
        }

        if pending.code != code.trim() {
            return Err(AppError::InvalidCode);
        }

        sms_codes::delete_code(self.conn, &phone)?;
        let user = users::find_by_id(self.conn, pending.user_id)?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::not_found("User", &phone))?;

        ttlog(self.conn, "sms_verify", &phone, &format!("{} verified", user.full_name))?;
        Ok(user)
    }
}
