use std::path::Path;

use savedio_core::BookmarkList;

use crate::commands::common::{open_database, resolve_list_name};
use crate::error::CliError;

pub fn format_list_lines(lists: &[BookmarkList]) -> Vec<String> {
    lists
        .iter()
        .map(|list| {
            let count = list.bookmarks.len();
            let noun = if count == 1 { "bookmark" } else { "bookmarks" };
            if list.notify {
                format!("{:<20}  {count:>4} {noun}  (notify)", list.name)
            } else {
                format!("{:<20}  {count:>4} {noun}", list.name)
            }
        })
        .collect()
}

pub async fn run_lists(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let lists = db.lists().await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&lists)?);
    } else if lists.is_empty() {
        println!("No lists yet.");
    } else {
        for line in format_list_lines(&lists) {
            println!("{line}");
        }
    }

    Ok(())
}

pub async fn run_notify(list: &str, off: bool, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let name = resolve_list_name(list, &db).await?;
    db.set_list_notify(&name, !off).await?;

    let state = if off { "disabled" } else { "enabled" };
    println!("Notifications {state} for {name}");
    Ok(())
}
