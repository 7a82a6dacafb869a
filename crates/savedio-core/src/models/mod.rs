//! Data models for Saved.io++

mod bookmark;
mod bookmark_list;
mod settings;
mod sync_result;

pub use bookmark::{
    compare_bookmarks, format_date, sort_bookmarks, Bookmark, BookmarkId, DATE_FORMAT,
};
pub use bookmark_list::{normalize_list_name, BookmarkList};
pub use settings::{Settings, SortOrder};
pub use sync_result::SyncResult;
