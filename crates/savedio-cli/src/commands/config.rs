use std::env;
use std::path::Path;

use savedio_core::config::ApiConfig;
use savedio_core::models::{Settings, SortOrder};
use savedio_core::services::DatabaseService;
use savedio_core::util::normalize_text_option;

use crate::cli::ConfigCommands;
use crate::commands::common::{open_database, USER_KEY_ENV};
use crate::error::CliError;

pub async fn run_config(command: ConfigCommands, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    match command {
        ConfigCommands::Show => run_config_show(&db).await,
        ConfigCommands::SetKey { key } => run_set_key(&db, &key).await,
        ConfigCommands::ClearKey => run_clear_key(&db).await,
        ConfigCommands::SmartFavorites { state } => run_smart_favorites(&db, state.is_on()).await,
        ConfigCommands::Sort { order } => run_sort(&db, order.into()).await,
    }
}

async fn run_config_show(db: &DatabaseService) -> Result<(), CliError> {
    let settings = db.load_settings().await?;
    let env_key = env::var(USER_KEY_ENV).ok();
    let api = ApiConfig::from_env()?;

    for line in describe_settings(&settings, env_key.as_deref(), &api) {
        println!("{line}");
    }
    if let Some(path) = db.db_path() {
        println!("database: {}", path.display());
    }
    Ok(())
}

pub fn describe_settings(
    settings: &Settings,
    env_key: Option<&str>,
    api: &ApiConfig,
) -> Vec<String> {
    let env_key = env_key.map(str::trim).filter(|key| !key.is_empty());
    let user_key = if env_key.is_some() {
        format!("set via {USER_KEY_ENV}")
    } else if settings.is_online() {
        "set".to_string()
    } else {
        "not set (offline)".to_string()
    };

    vec![
        format!("user key: {user_key}"),
        format!(
            "smart favorites: {}",
            if settings.smart_favorites { "on" } else { "off" }
        ),
        format!("sort order: {}", sort_order_name(settings.sort_order)),
        format!("api url: {}", api.base_url),
        format!(
            "developer key: {}",
            if api.dev_key.is_some() { "set" } else { "not set" }
        ),
    ]
}

pub const fn sort_order_name(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Date => "date",
        SortOrder::Title => "title",
        SortOrder::Clicks => "clicks",
    }
}

async fn run_set_key(db: &DatabaseService, key: &str) -> Result<(), CliError> {
    let key = normalize_text_option(Some(key.to_string())).ok_or(CliError::EmptyUserKey)?;
    let mut settings = db.load_settings().await?;
    settings.user_api_key = Some(key);
    db.save_settings(&settings).await?;

    println!("User key saved. Run `savedio sync` to download your bookmarks.");
    Ok(())
}

async fn run_clear_key(db: &DatabaseService) -> Result<(), CliError> {
    let mut settings = db.load_settings().await?;
    settings.user_api_key = None;
    db.save_settings(&settings).await?;

    println!("User key removed; working offline.");
    Ok(())
}

/// Changing the flag recomputes favorites from scratch.
async fn run_smart_favorites(db: &DatabaseService, enabled: bool) -> Result<(), CliError> {
    let mut settings = db.load_settings().await?;
    settings.smart_favorites = enabled;
    db.save_settings(&settings).await?;

    db.clear_favorites().await?;
    if enabled {
        let marked = db.mark_smart_favorites().await?;
        println!("Smart favorites on; {marked} bookmarks marked as favorite");
    } else {
        println!("Smart favorites off; favorites cleared");
    }
    Ok(())
}

async fn run_sort(db: &DatabaseService, order: SortOrder) -> Result<(), CliError> {
    let mut settings = db.load_settings().await?;
    settings.sort_order = order;
    db.save_settings(&settings).await?;

    println!("Sort order: {}", sort_order_name(order));
    Ok(())
}
