use crate::cli::commands::open_session;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::timesheet::{Timesheet, TimesheetLogic};
use crate::db::projects;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::models::Page;
use crate::ui::messages::{header, info};
use crate::utils::date::{day_label, resolve_week};
use crate::utils::formatting::truncate;
use crate::utils::table::{Column, Table};
use std::collections::HashMap;

fn hours_cell(h: f64) -> String {
    if h > 0.0 { format!("{h:.2}") } else { "-".into() }
}

fn print_timesheet(ts: &Timesheet) {
    header(format!(
        "{} - week of {} to {} - {:.2} h",
        ts.group, ts.week_start, ts.week_end, ts.total
    ));

    let mut columns = vec![Column::new("Employee", 24)];
    columns.extend(ts.days.iter().map(|d| Column::new(&day_label(*d), 10)));
    columns.push(Column::new("Total", 8));

    let mut table = Table::new(columns);
    for u in &ts.users {
        let mut row = vec![truncate(&u.user_name, 24)];
        row.extend(u.days.iter().map(|d| hours_cell(d.hours)));
        row.push(format!("{:.2}", u.total));
        table.add_row(row);
    }

    let mut totals = vec!["Total".to_string()];
    totals.extend(ts.day_totals.iter().map(|h| hours_cell(*h)));
    totals.push(format!("{:.2}", ts.total));
    table.add_row(totals);

    print!("{}", table.render());
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Timesheet {
        group,
        week,
        export,
        file,
        force,
    } = &cli.command
    else {
        return Ok(());
    };
    let (pool, session) = open_session(cli, cfg)?;
    session.require(Page::Timesheet)?;

    let Some(group) = group else {
        let groups = TimesheetLogic::groups(&pool.conn, session.company_id())?;
        if groups.is_empty() {
            info("No groups yet. Set one with `user edit <ID> --group <NAME>`.");
        } else {
            header("Groups");
            for g in groups {
                println!("  {g}");
            }
        }
        return Ok(());
    };

    let start = resolve_week(week.as_deref(), cfg.week_starts_on)?;
    let ts = TimesheetLogic::build(&pool.conn, cfg, session.company_id(), group, start)?;
    print_timesheet(&ts);

    if let Some(format) = export {
        let numbers: HashMap<i64, String> = projects::list(&pool.conn, session.company_id(), true)?
            .into_iter()
            .map(|p| (p.id, p.project_number))
            .collect();
        ExportLogic::export(&ts, &session.company.name, &numbers, *format, file.as_deref(), *force)?;
    }

    Ok(())
}
