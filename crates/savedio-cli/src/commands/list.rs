use std::path::Path;

use savedio_core::db::BookmarkFilter;
use savedio_core::models::SortOrder;

use crate::commands::common::{
    bookmark_to_list_item, format_bookmark_lines, open_database, resolve_list_name,
    BookmarkListItem,
};
use crate::error::CliError;

/// List names are matched against the store by [`run_list`].
pub fn bookmark_filter(list: Option<&str>, favorites: bool, clicked: bool) -> BookmarkFilter {
    match list {
        Some(list) => BookmarkFilter::InList(list.trim().to_string()),
        None if favorites => BookmarkFilter::Favorites,
        None if clicked => BookmarkFilter::Clicked,
        None => BookmarkFilter::All,
    }
}

pub async fn run_list(
    filter: BookmarkFilter,
    sort: Option<SortOrder>,
    limit: Option<usize>,
    as_json: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let filter = match filter {
        BookmarkFilter::InList(name) => {
            BookmarkFilter::InList(resolve_list_name(&name, &db).await?)
        }
        other => other,
    };
    let order = match sort {
        Some(order) => order,
        None => db.load_settings().await?.sort_order,
    };

    let mut bookmarks = db.list_bookmarks(&filter, order).await?;
    if let Some(limit) = limit {
        bookmarks.truncate(limit);
    }

    if as_json {
        let json_items = bookmarks
            .iter()
            .map(bookmark_to_list_item)
            .collect::<Vec<BookmarkListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_bookmark_lines(&bookmarks) {
            println!("{line}");
        }
    }

    Ok(())
}
