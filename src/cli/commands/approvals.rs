use crate::cli::commands::open_session;
use crate::cli::parser::{ApprovalCmd, Cli, Commands};
use crate::config::Config;
use crate::core::approval::{ApprovalLogic, EntryEdit, Filter};
use crate::errors::AppResult;
use crate::models::{Page, PunchEntry};
use crate::ui::messages::{header, info, success};
use crate::utils::colors::colorize_status;
use crate::utils::fmt_hours;
use crate::utils::time::{hm, now, parse_datetime};

fn print_entry(e: &PunchEntry) {
    println!(
        "   #{:<5} {}  {} → {:<5}  {:<20} lunch {:>3} min  {:>9}  {}",
        e.id,
        e.work_date,
        hm(e.punch_in),
        e.punch_out.map(hm).unwrap_or_else(|| "...".into()),
        e.project_name,
        e.lunch_break,
        fmt_hours(e.hours()),
        colorize_status(e.status)
    );
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Approvals { action } = &cli.command else {
        return Ok(());
    };
    let (pool, session) = open_session(cli, cfg)?;
    session.require(Page::Approvals)?;
    let approver = &session.user;
    let conn = &pool.conn;

    match action {
        ApprovalCmd::List { all } => {
            let filter = if *all { Filter::All } else { Filter::Pending };
            let groups = ApprovalLogic::list(conn, cfg, approver, filter)?;
            if groups.is_empty() {
                info("Nothing to approve.");
                return Ok(());
            }
            for g in &groups {
                header(format!("{} ({} pending)", g.user_name, g.pending));
                for e in &g.entries {
                    print_entry(e);
                }
            }
        }

        ApprovalCmd::Approve { id } => {
            let e = ApprovalLogic::approve(conn, cfg, approver, *id, now())?;
            success(format!("Entry #{} of {} approved ({})", e.id, e.user_name, fmt_hours(e.hours())));
        }

        ApprovalCmd::Reject { id } => {
            let e = ApprovalLogic::reject(conn, cfg, approver, *id, now())?;
            success(format!("Entry #{} of {} rejected", e.id, e.user_name));
        }

        ApprovalCmd::Edit {
            id,
            punch_in,
            punch_out,
            lunch,
            project,
        } => {
            let edit = EntryEdit {
                punch_in: punch_in.as_deref().map(parse_datetime).transpose()?,
                punch_out: punch_out.as_deref().map(parse_datetime).transpose()?,
                lunch: *lunch,
                project_id: *project,
            };
            let e = ApprovalLogic::edit(conn, cfg, approver, *id, &edit, now())?;
            success(format!("Entry #{} of {} updated", e.id, e.user_name));
            print_entry(&e);
        }
    }

    Ok(())
}
