//! `portal` command-line entry point.

mod args;
mod commands;

use std::process::ExitCode;

use clap::Parser;

use portal_auth::RouteTable;
use portal_directory::HttpUserDirectory;
use portal_observability::LogOptions;
use portal_session::{AuthorizationContext, FileStore, SessionConfig};

use crate::args::{Cli, Command, PermissionsCommand};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    portal_observability::init(LogOptions::verbosity(cli.verbose));

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = SessionConfig::from_env();
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = dir;
    }
    if let Some(url) = cli.api_url {
        config.api_url = url.trim_end_matches('/').to_string();
    }
    tracing::debug!(
        storage_dir = %config.storage_dir.display(),
        api_url = %config.api_url,
        "configuration resolved"
    );

    let mut ctx = AuthorizationContext::init(config.session_store())?;

    let mut exit = ExitCode::SUCCESS;
    let output = match cli.command {
        Command::Login { token } => commands::login(&mut ctx, &token)?,
        Command::Whoami => commands::whoami(&ctx),
        Command::Logout => commands::logout(&mut ctx),
        Command::Check { path } => {
            let out = commands::check(&ctx, &RouteTable::console(), &path);
            if out["redirect"].is_string() {
                exit = ExitCode::from(2);
            }
            out
        }
        Command::Me => commands::me(&directory(&config, &ctx)).await?,
        Command::Users => commands::users(&directory(&config, &ctx)).await?,
        Command::Permissions { action } => match action {
            PermissionsCommand::Get { id } => {
                commands::permissions_get(&directory(&config, &ctx), id).await?
            }
            PermissionsCommand::Toggle { id, code } => {
                commands::permissions_toggle(&directory(&config, &ctx), id, &code).await?
            }
            PermissionsCommand::Catalog => commands::permissions_catalog(),
        },
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(exit)
}

fn directory(config: &SessionConfig, ctx: &AuthorizationContext<FileStore>) -> HttpUserDirectory {
    HttpUserDirectory::new(config.api_url.clone(), ctx.credential().cloned())
}
