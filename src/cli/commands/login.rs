use crate::cli::commands::open_session;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::punch::PunchLogic;
use crate::db::entries;
use crate::errors::AppResult;
use crate::ui::messages::{detail, header, info, success};
use crate::utils::time::{hm, now};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let (pool, session) = open_session(cli, cfg)?;
    let user = &session.user;

    success(format!(
        "Welcome {} ({}, {})",
        user.full_name, user.role, session.company.name
    ));
    if user.has_admin_access() {
        detail("administrator");
    } else if user.role.is_approver() || !user.approves_users.is_empty() {
        detail("approver");
    }

    match entries::find_open_for_user(&pool.conn, user.id)? {
        Some(open) => info(format!(
            "Punched in on {} since {} ({})",
            open.project_name,
            hm(open.punch_in),
            open.elapsed_label(now())
        )),
        None => info("Not punched in."),
    }

    let projects = PunchLogic::available_projects(&pool.conn, cfg, user)?;
    header("Available projects");
    if projects.is_empty() {
        detail("none");
    }
    for p in &projects {
        println!("  #{:<4} {} ({})", p.id, p.name, p.project_number);
    }

    Ok(())
}
