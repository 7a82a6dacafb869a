use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use pretty_assertions::assert_eq;
use savedio_core::config::ApiConfig;
use savedio_core::db::BookmarkFilter;
use savedio_core::models::{Settings, SortOrder};
use savedio_core::services::DatabaseService;
use savedio_core::sync::{
    ListChangeNotification, SyncErrorCategory, SyncFailure, SyncOutcome, TriggerOutcome,
};
use savedio_core::{Bookmark, BookmarkId, BookmarkList};
use tempfile::TempDir;

use crate::cli::{Cli, Commands, CompletionShell, ConfigCommands, ExportFormat, Switch};
use crate::commands::common::{
    bookmark_to_list_item, format_bookmark_lines, format_sync_timestamp,
    normalize_bookmark_identifier, resolve_bookmark, resolve_list_name, resolve_user_key,
    truncate,
};
use crate::commands::completions::render_completions;
use crate::commands::config::{describe_settings, run_config};
use crate::commands::export::run_export;
use crate::commands::import::run_import;
use crate::commands::list::bookmark_filter;
use crate::commands::lists::{format_list_lines, run_notify};
use crate::commands::sync::{notification_lines, report_outcome};
use crate::error::CliError;

fn test_db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("savedio.db")
}

fn bookmark(id: &str, title: &str, list: &str) -> Bookmark {
    let mut bookmark = Bookmark::new(format!("https://{id}.example"), title);
    bookmark.id = BookmarkId::from(id);
    bookmark.list_name = list.to_string();
    bookmark
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn sync_flags_parse() {
    let cli = Cli::try_parse_from(["savedio", "sync"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Sync {
            command: None,
            immediate: false,
            watch: false
        })
    ));

    let cli = Cli::try_parse_from(["savedio", "sync", "--immediate"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Sync {
            immediate: true,
            ..
        })
    ));
    assert!(Cli::try_parse_from(["savedio", "sync", "--immediate", "--watch"]).is_err());
}

#[test]
fn normalize_bookmark_identifier_rejects_empty() {
    assert!(matches!(
        normalize_bookmark_identifier(" \n "),
        Err(CliError::EmptyBookmarkId)
    ));
    assert_eq!(normalize_bookmark_identifier("  abc123  ").unwrap(), "abc123");
}

#[test]
fn environment_user_key_wins_over_stored_key() {
    let settings = Settings {
        user_api_key: Some("stored".to_string()),
        ..Settings::default()
    };

    assert_eq!(
        resolve_user_key(Some("from-env".to_string()), &settings).as_deref(),
        Some("from-env")
    );
    assert_eq!(
        resolve_user_key(Some("  ".to_string()), &settings).as_deref(),
        Some("stored")
    );
    assert_eq!(resolve_user_key(None, &Settings::default()), None);
}

#[test]
fn truncate_collapses_whitespace_and_adds_ellipsis() {
    assert_eq!(truncate("  short \n title ", 40), "short title");
    assert_eq!(
        truncate("This is a very long sentence that should be shortened", 20),
        "This is a very lo..."
    );
}

#[test]
fn format_sync_timestamp_handles_never() {
    assert_eq!(format_sync_timestamp(0), "never");
    assert_eq!(format_sync_timestamp(1_000), "1970-01-01 00:00:01 UTC");
}

#[test]
fn bookmark_lines_mark_favorites_and_lists() {
    let mut favorite = bookmark("abc", "Rust", "work");
    favorite.is_favorite = true;
    let untitled = bookmark("def", "", "");

    let lines = format_bookmark_lines(&[favorite, untitled]);

    assert!(lines[0].starts_with("* abc"));
    assert!(lines[0].ends_with("[work]"));
    assert!(lines[1].starts_with("  def"));
    assert!(lines[1].ends_with("https://def.example"));
}

#[test]
fn list_items_carry_favicon() {
    let saved = bookmark("abc", "Rust", "work");
    let item = bookmark_to_list_item(&saved);
    let json = serde_json::to_value(&item).unwrap();

    assert_eq!(json["id"], "abc");
    assert_eq!(json["list_name"], "work");
    assert_eq!(json["favicon"], "https://abc.example/favicon.ico");
}

#[test]
fn list_lines_show_count_and_notify() {
    let mut work = BookmarkList::new("work");
    work.notify = true;
    work.bookmarks = vec![BookmarkId::from("a"), BookmarkId::from("b")];
    let mut misc = BookmarkList::new("misc");
    misc.bookmarks = vec![BookmarkId::from("c")];

    let lines = format_list_lines(&[work, misc]);

    assert!(lines[0].contains("2 bookmarks"));
    assert!(lines[0].ends_with("(notify)"));
    assert!(lines[1].ends_with("1 bookmark"));
}

#[test]
fn bookmark_filter_keeps_typed_list_name() {
    assert_eq!(
        bookmark_filter(Some(" Read-Later "), false, false),
        BookmarkFilter::InList("Read-Later".to_string())
    );
    assert_eq!(
        bookmark_filter(None, true, false),
        BookmarkFilter::Favorites
    );
    assert_eq!(bookmark_filter(None, false, true), BookmarkFilter::Clicked);
    assert_eq!(bookmark_filter(None, false, false), BookmarkFilter::All);
}

#[test]
fn describe_settings_never_prints_keys() {
    let settings = Settings {
        user_api_key: Some("secret-user".to_string()),
        smart_favorites: true,
        sort_order: SortOrder::Clicks,
    };
    let api = ApiConfig {
        base_url: "https://devapi.saved.io/".to_string(),
        dev_key: Some("secret-dev".to_string()),
    };

    let lines = describe_settings(&settings, None, &api);

    assert_eq!(lines[0], "user key: set");
    assert_eq!(lines[1], "smart favorites: on");
    assert_eq!(lines[2], "sort order: clicks");
    assert!(lines.iter().all(|line| !line.contains("secret")));

    let from_env = describe_settings(&Settings::default(), Some("key"), &api);
    assert_eq!(from_env[0], "user key: set via SAVEDIO_USER_KEY");
}

#[test]
fn sync_outcomes_map_to_cli_results() {
    assert!(matches!(
        report_outcome(&TriggerOutcome::Ran(SyncOutcome::Offline)),
        Err(CliError::SyncNotConfigured)
    ));
    assert!(matches!(
        report_outcome(&TriggerOutcome::Ran(SyncOutcome::Cancelled)),
        Err(CliError::SyncCancelled)
    ));
    assert!(matches!(
        report_outcome(&TriggerOutcome::Ran(SyncOutcome::Failed(SyncFailure {
            category: SyncErrorCategory::Authorization,
            message: "bad key".to_string(),
        }))),
        Err(CliError::SyncFailed {
            category: SyncErrorCategory::Authorization,
            ..
        })
    ));
    assert!(report_outcome(&TriggerOutcome::AlreadyRunning).is_ok());
    assert!(report_outcome(&TriggerOutcome::Fresh { last_sync: 1 }).is_ok());
}

#[test]
fn notification_points_at_the_changed_list() {
    let single = ListChangeNotification::new(["Read-Later".to_string()].into()).unwrap();
    let lines = notification_lines(&single);
    assert_eq!(lines[0], "List Read-Later has new bookmarks");
    assert_eq!(lines[2], "  Show it with: savedio list --list Read-Later");

    let many =
        ListChangeNotification::new(["news".to_string(), "work".to_string()].into()).unwrap();
    assert_eq!(notification_lines(&many)[2], "  Show them with: savedio lists");
}

#[test]
fn completions_name_the_binary() {
    let script = String::from_utf8(render_completions(CompletionShell::Bash)).unwrap();
    assert!(script.contains("savedio"));
}

#[tokio::test(flavor = "multi_thread")]
async fn resolve_bookmark_supports_exact_and_prefix_id() {
    let dir = TempDir::new().unwrap();
    let db = DatabaseService::open_path(test_db_path(&dir)).await.unwrap();
    db.add_bookmark(&bookmark("abc111", "A", "")).await.unwrap();
    db.add_bookmark(&bookmark("abc222", "B", "")).await.unwrap();
    db.add_bookmark(&bookmark("xyz", "C", "")).await.unwrap();

    let exact = resolve_bookmark("xyz", &db).await.unwrap();
    assert_eq!(exact.title, "C");

    let by_prefix = resolve_bookmark("abc2", &db).await.unwrap();
    assert_eq!(by_prefix.title, "B");

    assert!(matches!(
        resolve_bookmark("abc", &db).await,
        Err(CliError::AmbiguousBookmarkId(_))
    ));
    assert!(matches!(
        resolve_bookmark("nope", &db).await,
        Err(CliError::BookmarkNotFound(_))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn export_to_directory_then_import_into_fresh_database() {
    let dir = TempDir::new().unwrap();
    let source_path = dir.path().join("source.db");
    {
        let db = DatabaseService::open_path(&source_path).await.unwrap();
        db.add_bookmark(&bookmark("a", "A", "work")).await.unwrap();
        db.add_bookmark(&bookmark("b", "B", "")).await.unwrap();
    }

    let export_dir = dir.path().join("exports");
    std::fs::create_dir_all(&export_dir).unwrap();
    run_export(ExportFormat::Json, Some(&export_dir), &source_path)
        .await
        .unwrap();

    let exported = std::fs::read_dir(&export_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect::<Vec<_>>();
    assert_eq!(exported.len(), 1);
    let file_name = exported[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("Bookmarks-"));
    assert!(file_name.ends_with(".savediopp"));

    let target_path = dir.path().join("target.db");
    run_import(&exported[0], &target_path).await.unwrap();

    let target = DatabaseService::open_path(&target_path).await.unwrap();
    let imported = target
        .list_bookmarks(&BookmarkFilter::All, SortOrder::Title)
        .await
        .unwrap();
    assert_eq!(imported.len(), 2);
    assert_eq!(target.list_names().await.unwrap(), vec!["work".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn enabling_smart_favorites_recomputes_favorites() {
    let dir = TempDir::new().unwrap();
    let db_path = test_db_path(&dir);
    {
        let db = DatabaseService::open_path(&db_path).await.unwrap();
        let mut manual = bookmark("manual", "Manual", "");
        manual.is_favorite = true;
        db.add_bookmark(&manual).await.unwrap();
        db.add_bookmark(&bookmark("clicked", "Clicked", "")).await.unwrap();
        db.record_click(&BookmarkId::from("clicked")).await.unwrap();
    }

    run_config(
        ConfigCommands::SmartFavorites { state: Switch::On },
        &db_path,
    )
    .await
    .unwrap();

    let db = DatabaseService::open_path(&db_path).await.unwrap();
    let favorites = db
        .list_bookmarks(&BookmarkFilter::Favorites, SortOrder::Date)
        .await
        .unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].id.as_str(), "clicked");
    assert!(db.load_settings().await.unwrap().smart_favorites);
}

#[tokio::test(flavor = "multi_thread")]
async fn set_key_rejects_blank_key() {
    let dir = TempDir::new().unwrap();
    let db_path = test_db_path(&dir);

    let result = run_config(
        ConfigCommands::SetKey {
            key: "   ".to_string(),
        },
        &db_path,
    )
    .await;

    assert!(matches!(result, Err(CliError::EmptyUserKey)));
}

#[tokio::test(flavor = "multi_thread")]
async fn resolve_list_name_prefers_stored_spelling() {
    let dir = TempDir::new().unwrap();
    let db = DatabaseService::open_path(test_db_path(&dir)).await.unwrap();
    // remote list names are stored verbatim by sync
    db.add_bookmark(&bookmark("a", "A", "Read-Later")).await.unwrap();
    db.add_bookmark(&bookmark("b", "B", "work")).await.unwrap();

    assert_eq!(
        resolve_list_name(" Read-Later ", &db).await.unwrap(),
        "Read-Later"
    );
    assert_eq!(resolve_list_name("Work", &db).await.unwrap(), "work");
    assert!(matches!(
        resolve_list_name("read-later", &db).await,
        Err(CliError::ListNotFound(_))
    ));
    assert!(matches!(
        resolve_list_name("  ", &db).await,
        Err(CliError::EmptyListName)
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn notify_toggles_list_with_remote_spelling() {
    let dir = TempDir::new().unwrap();
    let db_path = test_db_path(&dir);
    {
        let db = DatabaseService::open_path(&db_path).await.unwrap();
        db.add_bookmark(&bookmark("a", "A", "Read-Later")).await.unwrap();
    }

    run_notify("Read-Later", false, &db_path).await.unwrap();

    let db = DatabaseService::open_path(&db_path).await.unwrap();
    let lists = db.lists().await.unwrap();
    assert_eq!(lists[0].name, "Read-Later");
    assert!(lists[0].notify);
}
