use std::env;
use std::path::{Path, PathBuf};

use savedio_core::config::ApiConfig;
use savedio_core::db::BookmarkFilter;
use savedio_core::models::{normalize_list_name, Settings, SortOrder};
use savedio_core::services::{BookmarkService, DatabaseService};
use savedio_core::sync::SavedioClient;
use savedio_core::util::{favicon_url, normalize_text_option};
use savedio_core::{Bookmark, BookmarkId};
use serde::Serialize;

use crate::error::CliError;

pub const DB_PATH_ENV: &str = "SAVEDIO_DB_PATH";
pub const USER_KEY_ENV: &str = "SAVEDIO_USER_KEY";

const SHORT_ID_LEN: usize = 12;

#[derive(Debug, Serialize)]
pub struct BookmarkListItem<'a> {
    #[serde(flatten)]
    pub bookmark: &'a Bookmark,
    pub favicon: Option<String>,
}

pub fn bookmark_to_list_item(bookmark: &Bookmark) -> BookmarkListItem<'_> {
    BookmarkListItem {
        bookmark,
        favicon: favicon_url(&bookmark.url),
    }
}

pub async fn open_database(path: &Path) -> Result<DatabaseService, CliError> {
    Ok(DatabaseService::open_path(path.to_path_buf()).await?)
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os(DB_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("savedio")
        .join("savedio.db")
}

/// The environment key wins over the stored one.
pub fn resolve_user_key(env_key: Option<String>, settings: &Settings) -> Option<String> {
    normalize_text_option(env_key).or_else(|| normalize_text_option(settings.user_api_key.clone()))
}

pub async fn api_client(db: &DatabaseService) -> Result<SavedioClient, CliError> {
    let settings = db.load_settings().await?;
    let user_key = resolve_user_key(env::var(USER_KEY_ENV).ok(), &settings);
    let config = ApiConfig::from_env()?;
    Ok(SavedioClient::new(&config, user_key)?)
}

pub async fn bookmark_service(db: &DatabaseService) -> Result<BookmarkService, CliError> {
    let client = api_client(db).await?;
    Ok(BookmarkService::new(db.clone(), client))
}

pub fn normalize_bookmark_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyBookmarkId)
    } else {
        Ok(trimmed.to_string())
    }
}

pub async fn resolve_bookmark(query: &str, db: &DatabaseService) -> Result<Bookmark, CliError> {
    let query = normalize_bookmark_identifier(query)?;
    if let Some(bookmark) = db.get_bookmark(&BookmarkId::from(query.as_str())).await? {
        return Ok(bookmark);
    }

    let mut matching = db
        .list_bookmarks(&BookmarkFilter::All, SortOrder::Date)
        .await?
        .into_iter()
        .filter(|bookmark| bookmark.id.as_str().starts_with(&query))
        .collect::<Vec<_>>();

    match matching.len() {
        0 => Err(CliError::BookmarkNotFound(query)),
        1 => Ok(matching.remove(0)),
        _ => {
            let options = matching
                .iter()
                .take(3)
                .map(|bookmark| short_id(&bookmark.id))
                .collect::<Vec<_>>()
                .join(", ");

            Err(CliError::AmbiguousBookmarkId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

/// Match a typed list name against the stored lists.
///
/// Lists created by sync keep the remote spelling, so the exact name is
/// tried before the normalized form that new bookmarks use.
pub async fn resolve_list_name(raw: &str, db: &DatabaseService) -> Result<String, CliError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CliError::EmptyListName);
    }

    let names = db.list_names().await?;
    if names.iter().any(|name| name == trimmed) {
        return Ok(trimmed.to_string());
    }
    match normalize_list_name(trimmed) {
        Ok(normalized) if names.contains(&normalized) => Ok(normalized),
        _ => Err(CliError::ListNotFound(trimmed.to_string())),
    }
}

pub fn short_id(id: &BookmarkId) -> String {
    id.as_str().chars().take(SHORT_ID_LEN).collect()
}

pub fn format_bookmark_lines(bookmarks: &[Bookmark]) -> Vec<String> {
    bookmarks
        .iter()
        .map(|bookmark| {
            let marker = if bookmark.is_favorite { '*' } else { ' ' };
            let id = short_id(&bookmark.id);
            let label = if bookmark.title.is_empty() {
                &bookmark.url
            } else {
                &bookmark.title
            };
            let label = truncate(label, 40);

            if bookmark.has_list() {
                format!("{marker} {id:<12}  {label:<40}  [{}]", bookmark.list_name)
            } else {
                format!("{marker} {id:<12}  {label}")
            }
        })
        .collect()
}

pub fn truncate(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_sync_timestamp(timestamp_ms: i64) -> String {
    if timestamp_ms <= 0 {
        return "never".to_string();
    }
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}
