use crate::cli::commands::open_session;
use crate::cli::parser::{Cli, Commands, UserCmd};
use crate::config::Config;
use crate::core::admin::AdminLogic;
use crate::errors::AppResult;
use crate::models::{Page, Role, UserDraft};
use crate::ui::messages::{info, success};
use crate::utils::table::{Column, Table};

fn parse_pages(raw: &[String]) -> AppResult<Vec<Page>> {
    raw.iter().map(|p| p.parse::<Page>()).collect()
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(",")
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::User { action } = &cli.command else {
        return Ok(());
    };
    let (pool, session) = open_session(cli, cfg)?;
    let conn = &pool.conn;

    match action {
        UserCmd::Add {
            name,
            user_pin,
            role,
            group,
            projects,
            pages,
            approves,
            admin,
            phone,
        } => {
            let draft = UserDraft {
                full_name: Some(name.clone()),
                pin_code: Some(user_pin.clone()),
                role: role.as_deref().map(Role::parse),
                group: group.clone(),
                assigned_projects: Some(projects.clone()),
                is_admin: Some(*admin),
                allowed_pages: Some(parse_pages(pages)?),
                approves_users: Some(approves.clone()),
                phone: phone.clone(),
            };
            let user = AdminLogic::add_user(conn, &session, &draft)?;
            success(format!("User #{} {} added ({})", user.id, user.full_name, user.role));
        }

        UserCmd::Edit {
            id,
            name,
            user_pin,
            role,
            group,
            projects,
            pages,
            approves,
            admin,
            phone,
        } => {
            let draft = UserDraft {
                full_name: name.clone(),
                pin_code: user_pin.clone(),
                role: role.as_deref().map(Role::parse),
                group: group.clone(),
                assigned_projects: projects.clone(),
                is_admin: *admin,
                allowed_pages: pages.as_deref().map(parse_pages).transpose()?,
                approves_users: approves.clone(),
                phone: phone.clone(),
            };
            let user = AdminLogic::edit_user(conn, &session, *id, &draft)?;
            success(format!("User #{} {} updated", user.id, user.full_name));
        }

        UserCmd::Remove { id } => {
            let user = AdminLogic::remove_user(conn, &session, *id)?;
            success(format!("User #{} {} deactivated", user.id, user.full_name));
        }

        UserCmd::List => {
            let users = AdminLogic::list_users(conn, &session)?;
            if users.is_empty() {
                info("No active users.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("ID", 4),
                Column::new("Name", 22),
                Column::new("Role", 22),
                Column::new("Group", 14),
                Column::new("Admin", 5),
                Column::new("Projects", 10),
                Column::new("Phone", 13),
            ]);
            for u in &users {
                table.add_row(vec![
                    u.id.to_string(),
                    u.full_name.clone(),
                    u.role.to_string(),
                    u.group.clone(),
                    if u.has_admin_access() { "yes" } else { "" }.to_string(),
                    join_ids(&u.assigned_projects),
                    u.phone.clone().unwrap_or_default(),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
