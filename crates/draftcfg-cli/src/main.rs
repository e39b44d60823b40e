//! draftcfg CLI
//!
//! Inspect and edit a JSON configuration described by a draft file.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use context::StoreContext;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose).map_err(|e| CliError::Logging(e.to_string()))?;
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Some(cmd) => {
            let ctx = StoreContext::resolve(cli.draft, cli.path, cli.no_create)?;
            execute_command(&ctx, cmd)
        }
        None => {
            println!("{} draft-backed configuration CLI", "draftcfg".green().bold());
            println!();
            println!("Run {} for available commands.", "draftcfg --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(ctx: &StoreContext, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Show => commands::run_show(ctx),
        Commands::Get { key } => commands::run_get(ctx, &key),
        Commands::Set { key, value } => commands::run_set(ctx, &key, &value),
        Commands::Reset => commands::run_reset(ctx),
        Commands::Describe { json } => commands::run_describe(ctx, json),
    }
}
