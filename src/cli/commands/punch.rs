use crate::cli::commands::open_session;
use crate::cli::parser::{Cli, Commands, PunchCmd};
use crate::config::Config;
use crate::core::hours::{format_gross, minutes_between};
use crate::core::punch::PunchLogic;
use crate::errors::AppResult;
use crate::models::Page;
use crate::ui::messages::{detail, success};
use crate::utils::fmt_hours;
use crate::utils::time::{at_or_now, hm};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Punch { action } = &cli.command else {
        return Ok(());
    };
    let (mut pool, session) = open_session(cli, cfg)?;
    session.require(Page::Punch)?;
    let user = &session.user;

    match action {
        PunchCmd::In {
            project,
            machine,
            plate,
            at,
        } => {
            let at = at_or_now(at.as_ref())?;
            let entry = PunchLogic::punch_in(
                &pool.conn,
                cfg,
                user,
                *project,
                machine.as_deref(),
                plate.as_deref(),
                at,
            )?;
            success(format!(
                "{} punched in on {} at {}",
                user.full_name,
                entry.project_name,
                hm(entry.punch_in)
            ));
            if let Some(eq) = entry.equipment() {
                detail(eq);
            }
        }

        PunchCmd::Out { lunch, at } => {
            let at = at_or_now(at.as_ref())?;
            let entry = PunchLogic::punch_out(&pool.conn, user, *lunch, at)?;
            success(format!(
                "{} punched out at {}: {}",
                user.full_name,
                hm(at),
                fmt_hours(entry.hours())
            ));
            detail(format!(
                "{} → {} ({}), lunch {} min, {}",
                hm(entry.punch_in),
                hm(at),
                format_gross(minutes_between(entry.punch_in, at)),
                entry.lunch_break,
                entry.status.label()
            ));
        }

        PunchCmd::Switch { project, machine, at } => {
            let at = at_or_now(at.as_ref())?;
            let (closed, opened) =
                PunchLogic::change_project(&mut pool.conn, cfg, user, *project, machine.as_deref(), at)?;
            success(format!(
                "Moved from {} to {} at {}",
                closed.project_name,
                opened.project_name,
                hm(at)
            ));
            detail(format!(
                "{} closed with {} ({})",
                closed.project_name,
                fmt_hours(closed.hours()),
                closed.status.label()
            ));
        }
    }

    Ok(())
}
