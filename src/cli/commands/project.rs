use crate::cli::commands::open_session;
use crate::cli::parser::{Cli, Commands, ProjectCmd};
use crate::config::Config;
use crate::core::admin::AdminLogic;
use crate::errors::AppResult;
use crate::models::ProjectDraft;
use crate::ui::messages::{info, success};
use crate::utils::table::{Column, Table};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Project { action } = &cli.command else {
        return Ok(());
    };
    let (pool, session) = open_session(cli, cfg)?;
    let conn = &pool.conn;

    match action {
        ProjectCmd::Add {
            name,
            number,
            address,
            users,
        } => {
            let draft = ProjectDraft {
                name: Some(name.clone()),
                project_number: Some(number.clone()),
                address: address.clone(),
                assigned_users: Some(users.clone()),
            };
            let p = AdminLogic::add_project(conn, &session, &draft)?;
            success(format!("Project #{} {} ({}) added", p.id, p.name, p.project_number));
        }

        ProjectCmd::Edit {
            id,
            name,
            number,
            address,
            users,
        } => {
            let draft = ProjectDraft {
                name: name.clone(),
                project_number: number.clone(),
                address: address.clone(),
                assigned_users: users.clone(),
            };
            let p = AdminLogic::edit_project(conn, &session, *id, &draft)?;
            success(format!("Project #{} {} updated", p.id, p.name));
        }

        ProjectCmd::Assign { id, user } => {
            let assigned = AdminLogic::toggle_assignment(conn, &session, *id, *user)?;
            if assigned {
                success(format!("User #{user} assigned to project #{id}"));
            } else {
                success(format!("User #{user} removed from project #{id}"));
            }
        }

        ProjectCmd::Remove { id } => {
            let p = AdminLogic::remove_project(conn, &session, *id)?;
            success(format!("Project #{} {} deactivated", p.id, p.name));
        }

        ProjectCmd::List => {
            let projects = AdminLogic::list_projects(conn, &session)?;
            if projects.is_empty() {
                info("No active projects.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("ID", 4),
                Column::new("Name", 24),
                Column::new("Number", 10),
                Column::new("Address", 28),
                Column::new("Users", 10),
            ]);
            for p in &projects {
                table.add_row(vec![
                    p.id.to_string(),
                    p.name.clone(),
                    p.project_number.clone(),
                    p.address.clone().unwrap_or_default(),
                    p.assigned_users.len().to_string(),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
