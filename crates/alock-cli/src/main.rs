//! alock CLI - A local, encrypted password store
//!
//! Command-line host for the alock core library: one passphrase-protected
//! file holding a tree of folders and credential entries.

mod cli;
mod commands;
mod config;
mod helpers;
mod output;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::{Context, NewEntryFields};

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let Some(command) = cli.command.as_ref() else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    if let Commands::Completions { shell } = command {
        return commands::handle_completions(*shell);
    }

    let config = config::load_config()?;
    let database = helpers::resolve_database_path(&cli, &config)?;
    tracing::debug!(path = %database.display(), "resolved database path");
    let ctx = Context {
        database,
        config,
        quiet: cli.quiet,
    };

    match command {
        Commands::Init { path, format } => {
            commands::handle_init(&ctx, path.as_deref(), (*format).into())
        }
        Commands::Tree => commands::handle_tree(&ctx),
        Commands::Show { path, reveal } => commands::handle_show(&ctx, path, *reveal),
        Commands::Mkdir { path } => commands::handle_mkdir(&ctx, path),
        Commands::Add {
            path,
            username,
            secret,
            url,
            notes,
        } => commands::handle_add(
            &ctx,
            path,
            NewEntryFields {
                username: username.clone(),
                secret: secret.clone(),
                url: url.clone(),
                notes: notes.clone(),
            },
        ),
        Commands::Rm { path, force } => commands::handle_rm(&ctx, path, *force),
        Commands::Mv { from, to } => commands::handle_mv(&ctx, from, to),
        Commands::Passwd => commands::handle_passwd(&ctx),
        Commands::Export { format } => commands::handle_export(&ctx, (*format).into()),
        Commands::Info => commands::handle_info(&ctx),
        Commands::Completions { .. } => Ok(()),
    }
}

/// Diagnostics go to stderr, filtered by ALOCK_LOG (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env("ALOCK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
