use crate::cli::commands::open_session;
use crate::cli::parser::{Cli, Commands, CompanyCmd};
use crate::config::Config;
use crate::core::company::{CompanyLogic, CompanyUpdate, FirstAdmin, NewCompany};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::{Company, Page, Role};
use crate::ui::messages::{detail, header, info, success};
use crate::ui::prompt::read_line;
use crate::utils::colors::colorize_optional;
use crate::utils::path::expand_tilde;
use crate::utils::time::now;

/// Save the company as the current one, unless running with `--test`.
pub(crate) fn remember_company(cli: &Cli, company: &Company, quiet: bool) -> AppResult<()> {
    if cli.test {
        return Ok(());
    }
    let mut saved = Config::load()?;
    saved.company_code = Some(company.join_code.clone());
    saved.save()?;
    if !quiet {
        info(format!("{} is now the current company.", company.name));
    }
    Ok(())
}

fn print_company(c: &Company) {
    header(&c.name);
    println!("Join code : {}", c.join_code);
    println!("Address   : {}", colorize_optional(c.address.as_deref()));
    println!("Phone     : {}", colorize_optional(c.phone.as_deref()));
    println!("Logo      : {}", colorize_optional(c.logo_path.as_deref()));
    println!("Created   : {}", c.created_at);
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Company { action } = &cli.command else {
        return Ok(());
    };

    match action {
        CompanyCmd::Create {
            name,
            admin_name,
            admin_role,
            admin_group,
            admin_pin,
            confirm_pin,
            admin_phone,
            address,
            phone,
            logo,
            join_code,
        } => {
            let pin_confirm = match confirm_pin {
                Some(p) => p.clone(),
                None => read_line("Confirm PIN")?,
            };

            let mut pool = DbPool::open(&cfg.database)?;
            let (company, admin) = CompanyLogic::create(
                &mut pool.conn,
                cfg,
                &NewCompany {
                    name: name.clone(),
                    address: address.clone(),
                    phone: phone.clone(),
                    logo: logo.as_deref().map(expand_tilde),
                    join_code: join_code.clone(),
                },
                &FirstAdmin {
                    full_name: admin_name.clone(),
                    role: Role::parse(admin_role),
                    group: admin_group.clone(),
                    pin: admin_pin.clone(),
                    pin_confirm,
                    phone: admin_phone.clone(),
                },
                now(),
            )?;

            success(format!("Company '{}' created", company.name));
            detail(format!("Join code: {}", company.join_code));
            detail(format!("Admin: #{} {} ({})", admin.id, admin.full_name, admin.role));
            remember_company(cli, &company, false)?;
        }

        CompanyCmd::Join { code } => {
            let pool = DbPool::open(&cfg.database)?;
            let company = CompanyLogic::join(&pool.conn, code)?;
            success(format!("Joined {} ({})", company.name, company.join_code));
            remember_company(cli, &company, false)?;
        }

        CompanyCmd::Show => {
            let (_pool, session) = open_session(cli, cfg)?;
            session.require(Page::Settings)?;
            print_company(&session.company);
        }

        CompanyCmd::Update {
            name,
            address,
            phone,
            logo,
        } => {
            let (pool, session) = open_session(cli, cfg)?;
            let company = CompanyLogic::update(
                &pool.conn,
                cfg,
                &session,
                &CompanyUpdate {
                    name: name.clone(),
                    address: address.clone(),
                    phone: phone.clone(),
                    logo: logo.as_deref().map(expand_tilde),
                },
            )?;
            success("Company updated");
            print_company(&company);
        }
    }

    Ok(())
}
