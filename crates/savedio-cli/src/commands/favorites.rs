use std::path::Path;

use crate::commands::common::{open_database, resolve_bookmark};
use crate::error::CliError;

pub async fn run_favorite(id: &str, off: bool, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let bookmark = resolve_bookmark(id, &db).await?;
    let updated = db.set_favorite(&bookmark.id, !off).await?;

    println!("{}", updated.id);
    Ok(())
}

pub async fn run_smart_favorites(db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let marked = db.mark_smart_favorites().await?;

    println!("{marked} bookmarks marked as favorite");
    Ok(())
}

pub async fn run_clear_favorites(db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path).await?;
    let cleared = db.clear_favorites().await?;

    println!("{cleared} favorites cleared");
    Ok(())
}
