pub mod add;
pub mod common;
pub mod completions;
pub mod config;
pub mod delete;
pub mod export;
pub mod favorites;
pub mod import;
pub mod list;
pub mod lists;
pub mod open;
pub mod sync;
