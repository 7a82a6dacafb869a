//! Database layer for Saved.io++

mod connection;
mod migrations;
mod repository;
mod settings_repository;
mod store;

pub use connection::Database;
pub use repository::{
    purge_list_if_empty, BookmarkFilter, BookmarkRepository, LibSqlBookmarkRepository,
};
pub use settings_repository::{LibSqlSettingsRepository, SettingsRepository};
pub use store::{BookmarkStore, LibSqlTransaction, StoreTransaction};
