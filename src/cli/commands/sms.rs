use crate::cli::commands::company::remember_company;
use crate::cli::parser::{Cli, Commands, SmsCmd};
use crate::config::Config;
use crate::core::sms::{SmsLogic, SmsRequest, sender_from_config};
use crate::db::companies;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{detail, success};
use crate::utils::time::now;

/// `--json` mode: one request, the reply printed as-is on stdout.
fn run_json(cli: &Cli, logic: &SmsLogic, request: SmsRequest) -> AppResult<()> {
    let reply = logic.handle(&request, now());
    let out = serde_json::to_string_pretty(&reply).map_err(|e| AppError::Other(e.to_string()))?;
    println!("{out}");

    if let Some(user) = &reply.user {
        let company = companies::load_company(logic.conn, user.company_id)?;
        remember_company(cli, &company, true)?;
    }

    if reply.success {
        Ok(())
    } else {
        Err(AppError::Sms(format!("{} failed", request.action)))
    }
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Sms { action } = &cli.command else {
        return Ok(());
    };
    let pool = DbPool::open(&cfg.database)?;
    let sender = sender_from_config(cfg);
    let logic = SmsLogic::new(&pool.conn, cfg, sender.as_ref());

    match action {
        SmsCmd::Send { phone, json: true } => run_json(
            cli,
            &logic,
            SmsRequest {
                action: "send".into(),
                phone: phone.clone(),
                code: None,
                company_id: None,
            },
        ),

        SmsCmd::Verify {
            phone,
            code,
            json: true,
        } => run_json(
            cli,
            &logic,
            SmsRequest {
                action: "verify".into(),
                phone: phone.clone(),
                code: Some(code.clone()),
                company_id: None,
            },
        ),

        SmsCmd::Send { phone, json: false } => {
            logic.send(phone, None, now())?;
            success(format!("Code sent to {phone}"));
            detail(format!("valid for {} minutes", cfg.sms_code_ttl_minutes));
            Ok(())
        }

        SmsCmd::Verify {
            phone,
            code,
            json: false,
        } => {
            let user = logic.verify(phone, code, now())?;
            let company = companies::load_company(&pool.conn, user.company_id)?;
            success(format!("Welcome back {}", user.full_name));
            detail(format!("Company code: {}", company.join_code));
            remember_company(cli, &company, false)
        }
    }
}
