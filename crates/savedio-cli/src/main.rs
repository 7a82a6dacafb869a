//! Saved.io++ CLI - manage saved.io bookmarks from the terminal
//!
//! Works offline against a local database; with a user key, changes go to
//! saved.io and `savedio sync` pulls the remote collection.

mod cli;
mod commands;
mod error;
#[cfg(test)]
mod tests;

use clap::{CommandFactory, Parser};
use tokio_util::sync::CancellationToken;

use crate::cli::{Cli, Commands, FavoritesCommands, SyncCommands};
use crate::commands::add::run_add;
use crate::commands::common::resolve_db_path;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::export::run_export;
use crate::commands::favorites::{run_clear_favorites, run_favorite, run_smart_favorites};
use crate::commands::import::run_import;
use crate::commands::list::{bookmark_filter, run_list};
use crate::commands::lists::{run_lists, run_notify};
use crate::commands::open::run_open;
use crate::commands::sync::{run_sync, run_sync_status, SyncMode};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "savedio=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);

    match cli.command {
        Some(Commands::Add {
            url,
            title,
            list,
            notes,
        }) => {
            run_add(
                &url,
                title.as_deref(),
                list.as_deref(),
                notes.as_deref(),
                &db_path,
            )
            .await?;
        }
        Some(Commands::List {
            list,
            favorites,
            clicked,
            sort,
            limit,
            json,
        }) => {
            let filter = bookmark_filter(list.as_deref(), favorites, clicked);
            run_list(filter, sort.map(Into::into), limit, json, &db_path).await?;
        }
        Some(Commands::Lists { json }) => run_lists(json, &db_path).await?,
        Some(Commands::Open { id }) => run_open(&id, &db_path).await?,
        Some(Commands::Delete { id }) => run_delete(&id, &db_path).await?,
        Some(Commands::Favorite { id, off }) => run_favorite(&id, off, &db_path).await?,
        Some(Commands::Favorites { command }) => match command {
            FavoritesCommands::Smart => run_smart_favorites(&db_path).await?,
            FavoritesCommands::Clear => run_clear_favorites(&db_path).await?,
        },
        Some(Commands::Notify { list, off }) => run_notify(&list, off, &db_path).await?,
        Some(Commands::Sync {
            command: Some(SyncCommands::Status { json }),
            ..
        }) => run_sync_status(json, &db_path).await?,
        Some(Commands::Sync {
            command: None,
            immediate,
            watch,
        }) => {
            let mode = if watch {
                SyncMode::Watch
            } else if immediate {
                SyncMode::Immediate
            } else {
                SyncMode::IfStale
            };
            let cancel = shutdown_token();
            run_sync(mode, &db_path, &cancel).await?;
        }
        Some(Commands::Export { format, output }) => {
            run_export(format, output.as_deref(), &db_path).await?;
        }
        Some(Commands::Import { path }) => run_import(&path, &db_path).await?,
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        Some(Commands::Config { command }) => run_config(command, &db_path).await?,
        None => {
            Cli::command().print_help().map_err(CliError::Io)?;
            println!();
        }
    }

    Ok(())
}

/// Token cancelled on Ctrl-C.
fn shutdown_token() -> CancellationToken {
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, stopping synchronization");
            on_signal.cancel();
        }
    });
    cancel
}
