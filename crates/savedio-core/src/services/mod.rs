//! Application services shared by clients.

mod bookmarks;
mod database;

pub use bookmarks::{BookmarkService, NewBookmark};
pub use database::DatabaseService;
