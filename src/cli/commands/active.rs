use crate::cli::commands::open_session;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::punch::PunchLogic;
use crate::errors::AppResult;
use crate::models::Page;
use crate::ui::messages::{header, info};
use crate::utils::time::{hm, now};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let (pool, session) = open_session(cli, cfg)?;
    session.require(Page::Active)?;

    let groups = PunchLogic::active_users(&pool.conn, session.company_id())?;
    if groups.is_empty() {
        info("Nobody is punched in.");
        return Ok(());
    }

    let at = now();
    for g in &groups {
        header(format!("{} ({})", g.project_name, g.entries.len()));
        for e in &g.entries {
            println!(
                "  {:<24} {:<22} since {}  {}",
                e.user_name,
                e.role.as_str(),
                hm(e.punch_in),
                e.elapsed_label(at)
            );
        }
    }
    Ok(())
}
