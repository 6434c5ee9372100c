use crate::cli::commands::open_session;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::punch::PunchLogic;
use crate::errors::AppResult;
use crate::models::Page;
use crate::ui::messages::{header, info, success};
use crate::utils::colors::colorize_status;
use crate::utils::date::{day_label, resolve_week, week_end};
use crate::utils::fmt_hours;
use crate::utils::formatting::bold;
use crate::utils::time::hm;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Hours { week, delete } = &cli.command else {
        return Ok(());
    };
    let (pool, session) = open_session(cli, cfg)?;
    session.require(Page::MyHours)?;
    let user = &session.user;

    if let Some(id) = delete {
        let entry = PunchLogic::delete_own(&pool.conn, user, *id)?;
        success(format!(
            "Entry #{} deleted ({} on {})",
            entry.id, entry.project_name, entry.work_date
        ));
        return Ok(());
    }

    let start = resolve_week(week.as_deref(), cfg.week_starts_on)?;
    let view = PunchLogic::my_week(&pool.conn, user, start)?;

    header(format!(
        "{} - week of {} to {}",
        user.full_name,
        view.week_start,
        week_end(view.week_start)
    ));

    if view.days.iter().all(|d| d.entries.is_empty()) {
        info("No entries this week.");
        return Ok(());
    }

    for day in view.days.iter().filter(|d| !d.entries.is_empty()) {
        println!("{}  {}", bold(&day_label(day.date)), fmt_hours(day.total));
        for e in &day.entries {
            println!(
                "   #{:<5} {} → {:<5}  {:<20} lunch {:>3} min  {:>9}  {}",
                e.id,
                hm(e.punch_in),
                e.punch_out.map(hm).unwrap_or_else(|| "...".into()),
                e.project_name,
                e.lunch_break,
                fmt_hours(e.hours()),
                colorize_status(e.status)
            );
        }
    }

    println!();
    println!("{} {}", bold("Week total:"), fmt_hours(view.total));
    Ok(())
}
