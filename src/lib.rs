//! logipunch library root.
//! Exposes the CLI parser, the high-level `run()` function and the internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Backup { .. } => commands::backup::handle(&cli.command, cfg),
        Commands::Company { .. } => commands::company::handle(cli, cfg),
        Commands::User { .. } => commands::user::handle(cli, cfg),
        Commands::Project { .. } => commands::project::handle(cli, cfg),
        Commands::Login => commands::login::handle(cli, cfg),
        Commands::Punch { .. } => commands::punch::handle(cli, cfg),
        Commands::Hours { .. } => commands::hours::handle(cli, cfg),
        Commands::Approvals { .. } => commands::approvals::handle(cli, cfg),
        Commands::Active => commands::active::handle(cli, cfg),
        Commands::Timesheet { .. } => commands::timesheet::handle(cli, cfg),
        Commands::Sms { .. } => commands::sms::handle(cli, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // config is loaded once, then command-line overrides win
    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(code) = &cli.company {
        cfg.company_code = Some(code.clone());
    }

    dispatch(&cli, &cfg)
}
